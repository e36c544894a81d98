//! Integration tests against a real headless browser
#![cfg(feature = "cdp")]

use devframe::{
    CdpRenderer, DeviceProfile, EmulationMode, MemoryArtworkStore, Point, PreviewConfig, Registry,
    Renderer, Size, ViewportSpec,
};
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgba, RgbaImage};
use std::sync::Once;
use tiny_http::{Response, Server};

static INIT: Once = Once::new();

/// Start a simple test HTTP server
fn start_test_server() -> String {
    INIT.call_once(|| {
        std::thread::spawn(|| {
            let server = Server::http("127.0.0.1:18091").unwrap();
            for request in server.incoming_requests() {
                let response = match request.url() {
                    "/" => Response::from_string(
                        r#"<!DOCTYPE html>
<html>
<head><title>Preview Page</title></head>
<body style="margin:0;background:#ff0000">
<h1>Hello devices</h1>
</body>
</html>"#,
                    )
                    .with_header(
                        "Content-Type: text/html; charset=utf-8"
                            .parse::<tiny_http::Header>()
                            .unwrap(),
                    ),
                    _ => Response::from_string("Not Found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });
        // Give the server time to start
        std::thread::sleep(std::time::Duration::from_millis(100));
    });

    "http://127.0.0.1:18091/".to_string()
}

fn renderer() -> CdpRenderer {
    let path = devframe::probe::detect_browser_path().expect("browser");
    let config = PreviewConfig {
        settle_delay_ms: 200,
        ..Default::default()
    };
    CdpRenderer::new(path, &config)
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_capture_returns_png() {
    let url = start_test_server();
    let png = renderer()
        .capture(&ViewportSpec::Explicit { width: 320, height: 240 }, &url)
        .expect("capture");
    assert!(png.len() > 100, "PNG data seems too small");
    assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_unreachable_url_fails() {
    let res = renderer().capture(&ViewportSpec::Explicit { width: 320, height: 240 }, "http://127.0.0.1:1/");
    assert!(res.is_err());
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_full_preview_with_real_browser() {
    let url = start_test_server();
    let profile = DeviceProfile {
        id: "phone".into(),
        screen: Size { width: 90, height: 160 },
        bezel_offset: Point { x: 5, y: 5 },
        layout: Point { x: 10, y: 10 },
        artwork: "phone.png".into(),
        corner_radius: 12,
        emulation: EmulationMode::Preset("iphone-12-pro".into()),
    };
    let frame = RgbaImage::from_fn(100, 170, |x, y| {
        if (5..95).contains(&x) && (5..165).contains(&y) {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([20, 20, 20, 255])
        }
    });
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(frame.as_raw(), 100, 170, image::ExtendedColorType::Rgba8)
        .unwrap();
    let store = MemoryArtworkStore::new().with("phone.png", png);

    let config = PreviewConfig {
        canvas: Size { width: 120, height: 200 },
        settle_delay_ms: 200,
        ..Default::default()
    };
    let canvas = devframe::composite(&url, &Registry::new(vec![profile]), &renderer(), &store, &config)
        .expect("composite");

    // page background is red; the screen centre should be too
    let centre = canvas.get_pixel(55, 90);
    assert!(centre[0] > 200 && centre[1] < 50 && centre[2] < 50, "{:?}", centre);
    // masked corner shows the white canvas
    assert_eq!(*canvas.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
}
