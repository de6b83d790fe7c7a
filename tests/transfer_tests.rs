// transfer_tests.rs - Export/import of the derived view
//
// Exports filtered products in every format and reads them back the way an
// operator would when re-importing a spreadsheet.

mod common;

use common::{sample_catalog, sample_store};

use coldchain_wms::dashboard::model::{FilterUpdate, StockStatus};
use coldchain_wms::dashboard::transfer::{
    export, export_products, import, products_from_records, ExportFormat, FlatRecord,
};
use coldchain_wms::dashboard::DashboardError;

const FORMATS: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Html];

#[test]
fn test_flat_record_columns() {
    let catalog = sample_catalog();
    let record = catalog.get(1).unwrap().to_flat_record();

    let columns: Vec<&str> = record.columns().collect();
    assert_eq!(columns[0], "id");
    assert_eq!(columns.len(), 16);
    assert_eq!(record.get("sku"), Some("SEA-SAL-001"));
    assert_eq!(record.get("name_vi"), Some("Phi lê cá hồi Na Uy"));
    assert_eq!(record.get("temperature_class"), Some("CHILL"));
    assert_eq!(record.get("certifications"), Some("ASC;HACCP"));
    assert_eq!(record.get("last_restocked"), Some("2026-10-10T07:30:00"));
    assert_eq!(record.get("subcategory"), Some("Cá"));
}

#[test]
fn test_export_then_import_restores_products() {
    let catalog = sample_catalog();

    for format in FORMATS {
        let text = export_products(catalog.products(), format).unwrap();
        let records = import(&text, format).unwrap();
        assert_eq!(records.len(), catalog.len(), "{}", format);

        let (products, status) = products_from_records(&records);
        assert_eq!(status.failed, 0, "{}: {:?}", format, status.errors);
        assert!(status.complete);

        assert_eq!(products.as_slice(), catalog.products(), "{}", format);
    }
}

#[test]
fn test_export_only_the_filtered_view() {
    let mut store = sample_store();
    store.set_filter(FilterUpdate::StockStatus(StockStatus::OutOfStock));

    let csv = export_products(store.visible_products(), ExportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,sku,name,name_vi"));
    assert!(lines[1].starts_with("4,SEA-SQD-004,"));
    assert!(lines[2].starts_with("12,DAI-MLK-012,"));
}

#[test]
fn test_csv_missing_cells_are_empty() {
    let records = vec![
        FlatRecord::new().with("a", "1").with("b", "2"),
        FlatRecord::new().with("a", "3"),
    ];
    let csv = export(&records, ExportFormat::Csv).unwrap();
    assert_eq!(csv, "a,b\n1,2\n3,\n");
}

#[test]
fn test_import_failures_report_format() {
    let cases = [
        ("a,b\n1,2,3\n", ExportFormat::Csv),
        ("{\"not\": \"an array\"}", ExportFormat::Json),
        ("<table><tr><th>a</th></tr><tr><td>1</td><td>2</td></tr></table>", ExportFormat::Html),
        ("no table here", ExportFormat::Html),
    ];

    for (text, format) in cases {
        match import(text, format) {
            Err(DashboardError::Import { format: name, .. }) => assert_eq!(name, format.to_string()),
            other => panic!("{}: expected import error, got {:?}", format, other),
        }
    }
}

#[test]
fn test_products_from_records_reports_bad_rows() {
    let csv = "\
id,sku,name,name_vi,category,temperature_class,stock,reorder_point,price,province,quality_grade,last_restocked
1,A-1,Apple,Táo,Trái cây,CHILL,10,5,30000,Lâm Đồng,A,2026-10-01T08:00:00
2,B-2,Bad Temp,Sai,Trái cây,WARM,10,5,30000,Lâm Đồng,A,2026-10-01T08:00:00
1,C-3,Dup,Trùng,Trái cây,DRY,10,5,30000,Lâm Đồng,B,2026-10-01T08:00:00
4,D-4,No Price,Không giá,Trái cây,DRY,10,5,,Lâm Đồng,B,2026-10-01T08:00:00
";
    let records = import(csv, ExportFormat::Csv).unwrap();
    let (products, status) = products_from_records(&records);

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].sku, "A-1");
    assert!(products[0].certifications.is_empty());
    assert!(!products[0].popular);

    assert_eq!(status.total, 4);
    assert_eq!(status.processed, 4);
    assert_eq!(status.succeeded, 1);
    assert_eq!(status.failed, 3);
    assert!(status.errors[0].starts_with("row 2:"));
    assert!(status.errors[1].contains("duplicate id 1"));
    assert!(status.errors[2].contains("price"));
}

#[test]
fn test_html_import_tolerates_attributes_and_whitespace() {
    let html = r#"
        <table class="products">
          <tr><th scope="col">sku</th><th scope="col">name</th></tr>
          <tr>
            <td class="mono">SEA-SAL-001</td>
            <td> Cá &amp; hồi </td>
          </tr>
        </table>
    "#;
    let records = import(html, ExportFormat::Html).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("sku"), Some("SEA-SAL-001"));
    assert_eq!(records[0].get("name"), Some("Cá & hồi"));
}

#[test]
fn test_html_import_of_hand_written_table() {
    let html = r#"
        <TABLE>
          <TR><TH>sku</TH><TH>name_vi</TH><TH>province</TH></TR>
          <TR><TD><b>DRY-CFE-020</b></TD><TD>C&#224; ph&ecirc; <em>rang</em></TD><TD>&#272;&#7855;k L&#7855;k</TD></TR>
        </TABLE>
    "#;
    let records = import(html, ExportFormat::Html).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("sku"), Some("DRY-CFE-020"));
    assert_eq!(records[0].get("name_vi"), Some("Cà phê rang"));
    assert_eq!(records[0].get("province"), Some("Đắk Lắk"));
}
