// ==========================================
// PackingImporter 集成测试
// ==========================================
// 测试目标: 验证完整的打包单导入流程
// ==========================================

use packing_ops::logging;
use packing_ops::{MainPhotoStatus, OrderStatus, PackingImporter, UploadedFile};

#[test]
fn test_import_csv_fixture_basic() {
    // 初始化日志系统
    logging::init_test();

    let file = UploadedFile::from_path("tests/fixtures/test_orders.csv")
        .expect("Failed to read fixture");

    let importer = PackingImporter::with_defaults();
    let output = importer.import(&file).expect("Import should succeed");

    // 行数守恒: 5 行数据,无空白行
    assert_eq!(output.report.total_rows, 5);
    assert_eq!(output.report.built, 5);
    assert_eq!(output.report.skipped_blank, 0);

    // 状态派生
    let orders = &output.orders;
    assert_eq!(orders[0].status, OrderStatus::Pending);
    assert_eq!(orders[1].status, OrderStatus::Pending);
    assert_eq!(orders[2].status, OrderStatus::MissingPhoto);
    // 缺单号和商品名,即使主图合法也是 invalid
    assert_eq!(orders[3].status, OrderStatus::Invalid);
    // 非法主图 URL 不算缺图
    assert_eq!(orders[4].status, OrderStatus::Pending);
    assert_eq!(orders[4].main_photo_status, MainPhotoStatus::Invalid);

    assert_eq!(output.report.invalid, 1);
    assert_eq!(output.report.missing_photo, 1);
}

#[test]
fn test_import_csv_fixture_field_mapping() {
    let file = UploadedFile::from_path("tests/fixtures/test_orders.csv").unwrap();
    let output = PackingImporter::with_defaults().import(&file).unwrap();

    let first = &output.orders[0];
    assert_eq!(first.order_number.as_deref(), Some("SO-1001"));
    assert_eq!(first.product_name.as_deref(), Some("Heart Pendant"));
    assert_eq!(first.variant.as_deref(), Some("Gold"));
    assert_eq!(first.color.as_deref(), Some("Red"));
    assert_eq!(first.customer.as_deref(), Some("Alice Wang"));
    assert_eq!(first.sku.as_deref(), Some("HP-01"));
    assert_eq!(first.quantity, 1);

    // 引号包裹的逗号分隔附图列表
    assert_eq!(first.polaroids.len(), 2);
    assert_eq!(first.polaroid_count, 2);
    assert_eq!(first.polaroids[0], "https://cdn.example.com/p/1001-a.jpg");

    // 空单元格保持缺失,不补空串
    assert_eq!(first.notes, None);
    assert_eq!(output.orders[1].color, None);
}

#[test]
fn test_import_semicolon_fixture() {
    let file = UploadedFile::from_path("tests/fixtures/test_orders_semicolon.csv").unwrap();
    let output = PackingImporter::with_defaults().import(&file).unwrap();

    assert_eq!(output.orders.len(), 2);
    assert_eq!(output.orders[0].order_number.as_deref(), Some("SO-2001"));
    assert_eq!(output.orders[0].quantity, 3);
    assert_eq!(output.orders[1].sku.as_deref(), Some("AK-02"));
}

#[test]
fn test_import_generates_unique_ids_across_batches() {
    let file = UploadedFile::from_path("tests/fixtures/test_orders.csv").unwrap();
    let importer = PackingImporter::with_defaults();

    // 两个批次之间 id 也不碰撞(UUID v4)
    let first = importer.import(&file).unwrap();
    let second = importer.import(&file).unwrap();

    let mut ids: Vec<&str> = first
        .orders
        .iter()
        .chain(second.orders.iter())
        .map(|o| o.id.as_str())
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn test_import_missing_file_is_error() {
    let result = UploadedFile::from_path("tests/fixtures/non_existent.csv");
    assert!(result.is_err());
}
