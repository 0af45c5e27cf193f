use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_sashcover")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "sashcover.exe"
            } else {
                "sashcover"
            });
            p
        })
}

fn smoke_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn cli_sample_writes_jpeg() {
    let out_path = smoke_dir("sample").join("window.jpg");
    let _ = std::fs::remove_file(&out_path);

    let status = std::process::Command::new(exe())
        .args(["sample", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let bytes = std::fs::read(&out_path).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (1200, 900));
}

#[test]
fn cli_catalog_prints_json() {
    let output = std::process::Command::new(exe())
        .arg("catalog")
        .output()
        .unwrap();

    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["textures"].as_array().unwrap().len(), 11);
    assert_eq!(v["colors"].as_array().unwrap().len(), 21);
    assert_eq!(v["colors"][0]["id"], "pure-white");
}

#[test]
fn cli_reveal_writes_jpeg() {
    let dir = smoke_dir("reveal");
    let before = dir.join("before.png");
    let after = dir.join("after.png");
    let out_path = dir.join("reveal.jpg");
    let _ = std::fs::remove_file(&out_path);
    image::RgbaImage::from_pixel(40, 30, image::Rgba([200, 0, 0, 255]))
        .save(&before)
        .unwrap();
    image::RgbaImage::from_pixel(40, 30, image::Rgba([0, 0, 200, 255]))
        .save(&after)
        .unwrap();

    let status = std::process::Command::new(exe())
        .arg("reveal")
        .arg("--before")
        .arg(&before)
        .arg("--after")
        .arg(&after)
        .args(["--position", "40", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    let img = image::open(&out_path).unwrap();
    assert_eq!((img.width(), img.height()), (40, 30));
}

#[test]
fn cli_sheet_fails_cleanly_on_missing_input() {
    let dir = smoke_dir("sheet_missing");
    let out_path = dir.join("sheet.jpg");
    let _ = std::fs::remove_file(&out_path);

    let output = std::process::Command::new(exe())
        .args([
            "sheet",
            "--before",
            "/nonexistent/before.jpg",
            "--after",
            "/nonexistent/after.jpg",
            "--texture",
            "cover-carbon",
            "--color",
            "anthracite",
            "--out",
        ])
        .arg(&out_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(!out_path.exists());
}
