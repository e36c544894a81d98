use devframe::async_api::Previewer;
use devframe::{
    DeviceProfile, EmulationMode, Error, MemoryArtworkStore, Point, PreviewConfig, Registry,
    Renderer, Size, ViewportSpec,
};
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgba, RgbaImage};

fn encode(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), img.width(), img.height(), image::ExtendedColorType::Rgba8)
        .expect("encode png");
    buf
}

struct Solid;

impl Renderer for Solid {
    fn capture(&self, viewport: &ViewportSpec, url: &str) -> devframe::Result<Vec<u8>> {
        if url.contains("broken") {
            return Err(Error::NavigationFailed("net::ERR_NAME_NOT_RESOLVED".into()));
        }
        let (w, h) = viewport.size();
        Ok(encode(&RgbaImage::from_pixel(w, h, Rgba([0, 120, 240, 255]))))
    }
}

fn registry() -> Registry {
    Registry::new(vec![DeviceProfile {
        id: "only".into(),
        screen: Size { width: 16, height: 12 },
        bezel_offset: Point { x: 2, y: 2 },
        layout: Point { x: 4, y: 4 },
        artwork: "only.png".into(),
        corner_radius: 3,
        emulation: EmulationMode::Viewport,
    }])
}

fn store() -> MemoryArtworkStore {
    let frame = RgbaImage::from_fn(20, 16, |x, y| {
        if (2..18).contains(&x) && (2..14).contains(&y) {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([50, 50, 50, 255])
        }
    });
    MemoryArtworkStore::new().with("only.png", encode(&frame))
}

fn config() -> PreviewConfig {
    PreviewConfig {
        canvas: Size { width: 32, height: 24 },
        settle_delay_ms: 0,
        ..Default::default()
    }
}

#[tokio::test]
async fn previewer_composites_on_worker() {
    let previewer = Previewer::new(Solid, store(), registry(), config()).await.expect("start");

    let canvas = previewer.composite("http://example.test/").await.expect("composite");
    assert_eq!(canvas.dimensions(), (32, 24));
    assert_eq!(*canvas.get_pixel(12, 10), Rgba([0, 120, 240, 255]));
    assert_eq!(*canvas.get_pixel(3, 3), Rgba([50, 50, 50, 255]));

    let many = previewer
        .composite_many(&["http://a.test/", "http://b.test/"])
        .await
        .expect("batch");
    assert_eq!(many.len(), 2);

    previewer.close().await.expect("close");
}

#[tokio::test]
async fn previewer_reports_capture_failures() {
    let previewer = Previewer::new(Solid, store(), registry(), config()).await.expect("start");
    let err = previewer.composite("http://broken.test/").await.unwrap_err();
    assert!(matches!(err, Error::CaptureFailed { ref device, .. } if device == "only"));
    previewer.close().await.expect("close");
}

#[tokio::test]
async fn previewer_rejects_invalid_registry() {
    let mut reg = registry();
    reg.devices[0].layout = Point { x: 30, y: 4 };
    let res = Previewer::new(Solid, store(), reg.clone(), config()).await;
    assert!(matches!(res, Err(Error::InvalidRegistry(_))));

    let previewer = Previewer::new(Solid, store(), registry(), config()).await.expect("start");
    assert!(previewer.set_registry(reg).await.is_err());
    // the previous registry is still in place
    assert!(previewer.composite("http://example.test/").await.is_ok());
    previewer.close().await.expect("close");
}
