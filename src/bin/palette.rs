// Command palette
//
// An interactive session over one ProductStore: each line is a command
// that mutates the filter state or prints part of the dashboard.
// Type `help` for the command list.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use coldchain_wms::dashboard::api::queries;
use coldchain_wms::dashboard::config::AppConfig;
use coldchain_wms::dashboard::model::FilterUpdate;
use coldchain_wms::dashboard::session::smart_filter::SmartFilter;
use coldchain_wms::dashboard::transfer::{self, ExportFormat};
use coldchain_wms::dashboard::{Catalog, ProductStore, ProductView};
use coldchain_wms::fixtures::{catalogs::ColdChainCatalog, CatalogFixture};

const SUGGESTION_LIMIT: usize = 8;

const HELP: &str = "\
Commands:
  search <text>          set the text query (no text clears it)
  filter <key> <value>   set one filter, e.g. `filter category Hải sản`
  smart <token>          smart filter, e.g. `smart low stock`
  page <n|next|prev>     go to a page (zero-based)
  reset                  clear all filters
  view                   show the current page
  history                show recent searches
  suggest <text>         search suggestions
  export <csv|json|html> print the filtered products
  alerts                 inventory alerts
  help                   this list
  quit                   leave";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => ColdChainCatalog::catalog().context("loading embedded sample catalog")?,
    };

    let mut store = ProductStore::new(catalog, config.store);
    println!("{} products loaded. Type `help` for commands.", store.catalog().len());
    print_view(&store.view());

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match run_command(&mut store, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("✗ {}", e),
        }
    }

    Ok(())
}

/// Returns false when the session should end
fn run_command(store: &mut ProductStore, line: &str) -> Result<bool> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_lowercase().as_str() {
        "" => {}
        "search" => {
            store.set_search(rest);
            print_view(&store.view());
        }
        "filter" => {
            let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            store.set_filter_by_key(key, value.trim())?;
            print_view(&store.view());
        }
        "smart" => {
            match store.apply_smart_filter(rest) {
                SmartFilter::Updates(updates) => println!("Applied {} filter update(s)", updates.len()),
                SmartFilter::Search(query) => println!("Not a smart filter, searching for '{}'", query),
            }
            print_view(&store.view());
        }
        "page" => {
            let current = store.view().page;
            let page = match rest {
                "next" => current + 1,
                "prev" => current.saturating_sub(1),
                n => n.parse().with_context(|| format!("invalid page '{}'", n))?,
            };
            store.set_filter(FilterUpdate::Page(page));
            print_view(&store.view());
        }
        "reset" => {
            store.reset_filters();
            print_view(&store.view());
        }
        "view" => print_view(&store.view()),
        "history" => {
            if store.history().is_empty() {
                println!("No recent searches");
            }
            for (idx, query) in store.history().iter().enumerate() {
                println!("  {}. {}", idx + 1, query);
            }
        }
        "suggest" => {
            for suggestion in store.suggestions(rest, SUGGESTION_LIMIT) {
                println!("  {:<40} {:?} ({})", suggestion.text, suggestion.kind, suggestion.score);
            }
        }
        "export" => {
            let format: ExportFormat = (if rest.is_empty() { "csv" } else { rest }).parse()?;
            let output = transfer::export_products(store.visible_products(), format)?;
            println!("{}", output);
        }
        "alerts" => {
            let alerts = queries::inventory_alerts(store.catalog());
            if alerts.is_empty() {
                println!("No inventory alerts");
            }
            for alert in alerts {
                println!(
                    "  [{:?}] {} {} ({}/{})",
                    alert.severity, alert.sku, alert.name, alert.stock, alert.reorder_point
                );
            }
        }
        "help" | "?" => println!("{}", HELP),
        "quit" | "exit" => return Ok(false),
        other => println!("Unknown command '{}'. Type `help` for commands.", other),
    }

    Ok(true)
}

fn print_view(view: &ProductView) {
    println!(
        "\n{} match(es), page {} ({} page(s))",
        view.total_count,
        view.page,
        view.page_count
    );
    for product in &view.items {
        println!(
            "  {:<12} {:<34} {:<6} {:>5}/{:<5} {:>10} VND  {}",
            product.sku,
            product.name_vi,
            product.temperature_class.to_string(),
            product.stock,
            product.reorder_point,
            product.price,
            product.province
        );
    }
    if !view.category_facets.is_empty() {
        let facets: Vec<String> = view
            .category_facets
            .iter()
            .map(|f| format!("{} ({})", f.value, f.count))
            .collect();
        println!("  Categories: {}", facets.join(", "));
    }
    println!();
}
