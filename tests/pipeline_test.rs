//! 不依赖浏览器的流水线测试：CSV 解析、收据路径、水印嵌入、归档

use std::fs;
use std::fs::File;
use std::path::Path;

use robot_order_submit::config::Config;
use robot_order_submit::services::watermark_service::embed_image_into_pdf;
use robot_order_submit::services::{ArchiveService, OrderSource, ReceiptService, WatermarkService};

/// 2x2 红色 PNG（嵌入测试用的最小合法图片）
const TINY_PNG: [u8; 73] = [
    137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13, 73, 72, 68, 82, 0, 0, 0, 2, 0, 0, 0, 2, 8, 2, 0,
    0, 0, 253, 212, 154, 115, 0, 0, 0, 16, 73, 68, 65, 84, 120, 156, 99, 248, 207, 192, 0, 68, 12,
    16, 10, 0, 31, 238, 3, 253, 139, 95, 20, 212, 0, 0, 0, 0, 73, 69, 78, 68, 174, 66, 96, 130,
];

/// 生成一个单页空白 PDF，模拟浏览器打印出的收据
fn write_minimal_pdf(path: &Path) {
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {},
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("保存 PDF 失败");
}

/// 读出 zip 中的全部文件名
fn zip_names(path: &Path) -> Vec<String> {
    let file = File::open(path).expect("打开 zip 失败");
    let mut archive = zip::ZipArchive::new(file).expect("读取 zip 失败");
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).expect("读取 zip 条目失败").name().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn test_csv_rows_preserve_order_and_values() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let csv_path = dir.path().join("orders.csv");
    fs::write(
        &csv_path,
        "Order number,Head,Body,Legs,Address\n\
         1,1,2,3,Test St 1\n\
         2,4,4,4,Somewhere 42\n\
         3,6,1,5,Back Alley 7\n",
    )
    .expect("写入 CSV 失败");

    let config = Config {
        orders_csv_path: csv_path.to_string_lossy().into_owned(),
        ..Config::default()
    };
    let orders = OrderSource::new(&config).read_local().expect("解析 CSV 失败");

    assert_eq!(orders.len(), 3);
    let numbers: Vec<&str> = orders.iter().map(|o| o.order_number.as_str()).collect();
    assert_eq!(numbers, ["1", "2", "3"]);
    assert_eq!(orders[1].head, "4");
    assert_eq!(orders[1].body, "4");
    assert_eq!(orders[1].legs, "4");
    assert_eq!(orders[2].address, "Back Alley 7");
}

#[test]
fn test_artifact_paths_derive_from_order_number() {
    let config = Config {
        receipts_dir: "output/receipts".to_string(),
        ..Config::default()
    };
    let receipt = ReceiptService::new(&config).receipt_path("1443");
    let screenshot = WatermarkService::new(&config).screenshot_path("1443");

    assert_eq!(receipt, Path::new("output/receipts/1443_receipt.pdf"));
    assert_eq!(screenshot, Path::new("output/receipts/robot_1443.png"));
}

#[test]
fn test_embed_rewrites_receipt_in_place() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let pdf_path = dir.path().join("7_receipt.pdf");
    let png_path = dir.path().join("robot_7.png");

    write_minimal_pdf(&pdf_path);
    fs::write(&png_path, TINY_PNG).expect("写入 PNG 失败");
    let before = fs::read(&pdf_path).expect("读取 PDF 失败");

    embed_image_into_pdf(&pdf_path, &png_path, (340.0, 420.0), (200.0, 266.0))
        .expect("嵌入截图失败");

    // 路径不变，内容就地重写
    let after = fs::read(&pdf_path).expect("读取 PDF 失败");
    assert_ne!(before, after);

    // 重写后的文件仍是可解析的 PDF
    let doc = lopdf::Document::load(&pdf_path).expect("重新加载 PDF 失败");
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_embed_missing_pdf_is_an_error() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let png_path = dir.path().join("robot_9.png");
    fs::write(&png_path, TINY_PNG).expect("写入 PNG 失败");

    let missing = dir.path().join("9_receipt.pdf");
    let result = embed_image_into_pdf(&missing, &png_path, (0.0, 0.0), (10.0, 10.0));
    assert!(result.is_err());
}

#[test]
fn test_archive_excludes_images() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let receipts_dir = dir.path().join("receipts");
    fs::create_dir_all(&receipts_dir).expect("创建收据目录失败");

    write_minimal_pdf(&receipts_dir.join("1_receipt.pdf"));
    write_minimal_pdf(&receipts_dir.join("2_receipt.pdf"));
    // 模拟某次运行中断后残留的截图
    fs::write(receipts_dir.join("robot_2.png"), TINY_PNG).expect("写入 PNG 失败");

    let archive_path = dir.path().join("receipts.zip");
    let config = Config {
        receipts_dir: receipts_dir.to_string_lossy().into_owned(),
        archive_path: archive_path.to_string_lossy().into_owned(),
        ..Config::default()
    };

    let count = ArchiveService::new(&config).archive().expect("归档失败");

    assert_eq!(count, 2);
    assert_eq!(zip_names(&archive_path), ["1_receipt.pdf", "2_receipt.pdf"]);
}

#[test]
fn test_archive_rerun_picks_up_new_receipt() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let receipts_dir = dir.path().join("receipts");
    fs::create_dir_all(&receipts_dir).expect("创建收据目录失败");
    write_minimal_pdf(&receipts_dir.join("1_receipt.pdf"));

    let archive_path = dir.path().join("receipts.zip");
    let config = Config {
        receipts_dir: receipts_dir.to_string_lossy().into_owned(),
        archive_path: archive_path.to_string_lossy().into_owned(),
        ..Config::default()
    };
    let service = ArchiveService::new(&config);

    assert_eq!(service.archive().expect("归档失败"), 1);

    // 崩溃后补跑：目录里多了一张收据，重跑归档应包含它
    write_minimal_pdf(&receipts_dir.join("2_receipt.pdf"));
    assert_eq!(service.archive().expect("归档失败"), 2);
    assert_eq!(zip_names(&archive_path), ["1_receipt.pdf", "2_receipt.pdf"]);
}

#[test]
fn test_archive_missing_dir_is_noop() {
    let dir = tempfile::tempdir().expect("创建临时目录失败");
    let config = Config {
        receipts_dir: dir
            .path()
            .join("does_not_exist")
            .to_string_lossy()
            .into_owned(),
        archive_path: dir.path().join("receipts.zip").to_string_lossy().into_owned(),
        ..Config::default()
    };

    let count = ArchiveService::new(&config).archive().expect("归档失败");
    assert_eq!(count, 0);
}
