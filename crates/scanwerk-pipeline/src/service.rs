// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central pipeline service — runs the heavy numeric stages on blocking
// worker tasks while the interactive side stays responsive.
//
// Detection requests carry a generation number: a newly started request
// supersedes any uncompleted one for the same service, and a stale
// completion is discarded without touching shared state (last-writer-wins
// by request order, not completion order). Interactive corner moves never
// pass through here; they are pure in-memory session mutations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use image::{DynamicImage, GrayImage};
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{CornerQuad, ScanConfig, StyleConfig};
use scanwerk_interact::CorrectionSession;
use scanwerk_vision::{rectify, Detection, DocumentDetector, DocumentStyler};
use tracing::{debug, info, instrument};

/// The most recent published detection.
#[derive(Debug, Clone)]
struct LatestDetection {
    generation: u64,
    detection: Detection,
    /// Working-image size the detection ran on.
    image_width: f64,
    image_height: f64,
    requested_at: DateTime<Utc>,
}

/// Shared pipeline service owned by the caller (typically one per open
/// image). All fields are cheaply cloneable so the service can be passed
/// into async blocks without lifetime issues.
#[derive(Clone)]
pub struct ScanService {
    config: Arc<Mutex<ScanConfig>>,
    generation: Arc<AtomicU64>,
    latest: Arc<Mutex<Option<LatestDetection>>>,
}

impl ScanService {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config: Arc::new(Mutex::new(config)),
            generation: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ScanConfig {
        self.config.lock().expect("config lock poisoned").clone()
    }

    /// Replace the configuration (e.g. after the user adjusts sensitivity).
    pub fn set_config(&self, config: ScanConfig) {
        *self.config.lock().expect("config lock poisoned") = config;
    }

    /// Run page-boundary detection on a working-resolution image.
    ///
    /// Returns `Ok(Some(detection))` when this request is still the newest
    /// one at completion time, `Ok(None)` when a later request superseded
    /// it (the stale result is dropped and shared state is untouched).
    #[instrument(skip(self, working))]
    pub async fn detect(&self, working: DynamicImage) -> Result<Option<Detection>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.run_detection(generation, working).await
    }

    async fn run_detection(
        &self,
        generation: u64,
        working: DynamicImage,
    ) -> Result<Option<Detection>> {
        let requested_at = Utc::now();
        let detector = DocumentDetector::new(self.config().detection);
        info!(generation, "detection requested");

        let image_width = working.width() as f64;
        let image_height = working.height() as f64;

        let detection = tokio::task::spawn_blocking(move || detector.detect(&working))
            .await
            .map_err(|err| ScanError::Worker(format!("detection task failed: {err}")))??;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "detection superseded; discarding result");
            return Ok(None);
        }

        let mut latest = self.latest.lock().expect("latest lock poisoned");
        *latest = Some(LatestDetection {
            generation,
            detection: detection.clone(),
            image_width,
            image_height,
            requested_at,
        });

        info!(generation, fallback = detection.fallback, "detection published");
        Ok(Some(detection))
    }

    /// The most recent published detection, if any.
    pub fn latest_detection(&self) -> Option<Detection> {
        self.latest
            .lock()
            .expect("latest lock poisoned")
            .as_ref()
            .map(|l| l.detection.clone())
    }

    /// Start interactive correction from the latest published detection.
    pub fn begin_correction(&self) -> Option<CorrectionSession> {
        let latest = self.latest.lock().expect("latest lock poisoned");
        latest.as_ref().map(|l| {
            debug!(generation = l.generation, requested_at = %l.requested_at, "correction session from latest detection");
            CorrectionSession::new(l.image_width, l.image_height, l.detection.corners)
        })
    }

    /// Cheap per-move redraw: lines and dots over the working image.
    ///
    /// Runs synchronously on the caller's thread; corner moves must never
    /// wait on the blocking workers.
    pub fn redraw(&self, working: &DynamicImage, session: &CorrectionSession) -> image::RgbImage {
        scanwerk_vision::detect::overlay::draw_overlay(&working.to_rgb8(), &session.corners())
    }

    /// Rectify the original image with committed original-space corners and
    /// render the scanned-document style, on a blocking worker.
    ///
    /// Degenerate corner sets surface as `DegenerateQuadrilateral`; nothing
    /// is substituted silently.
    #[instrument(skip(self, original, corners))]
    pub async fn rectify_and_render(
        &self,
        original: DynamicImage,
        corners: CornerQuad,
        style: StyleConfig,
    ) -> Result<GrayImage> {
        let styler = DocumentStyler::new(style);

        tokio::task::spawn_blocking(move || -> Result<GrayImage> {
            let flattened = rectify(&original, &corners)?;
            styler.render(&DynamicImage::ImageRgb8(flattened))
        })
        .await
        .map_err(|err| ScanError::Worker(format!("rectification task failed: {err}")))?
    }

    /// Render the scanned-document style directly, skipping rectification
    /// (the quick "auto" path).
    #[instrument(skip(self, image))]
    pub async fn render_auto(&self, image: DynamicImage, style: StyleConfig) -> Result<GrayImage> {
        let styler = DocumentStyler::new(style);

        tokio::task::spawn_blocking(move || styler.render(&image))
            .await
            .map_err(|err| ScanError::Worker(format!("render task failed: {err}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use scanwerk_core::Point2D;

    fn page_photo(w: u32, h: u32) -> DynamicImage {
        let mut img = GrayImage::from_pixel(w, h, Luma([40u8]));
        for y in h / 6..h * 5 / 6 {
            for x in w / 6..w * 5 / 6 {
                img.put_pixel(x, y, Luma([235u8]));
            }
        }
        DynamicImage::ImageLuma8(img)
    }

    #[tokio::test]
    async fn detect_publishes_the_result() {
        let service = ScanService::new(ScanConfig::default());
        let detection = service
            .detect(page_photo(320, 240))
            .await
            .expect("detect")
            .expect("not superseded");

        assert!(!detection.fallback);
        assert!(service.latest_detection().is_some());

        let session = service.begin_correction().expect("session");
        assert_eq!(session.corners(), detection.corners);
    }

    #[tokio::test]
    async fn config_can_be_replaced_at_runtime() {
        let service = ScanService::new(ScanConfig::default());

        let mut config = service.config();
        config.detection.sensitivity = 60.0;
        service.set_config(config);

        assert_eq!(service.config().detection.sensitivity, 60.0);
        // Detection still works with the adjusted sensitivity.
        let detection = service
            .detect(page_photo(320, 240))
            .await
            .expect("detect")
            .expect("published");
        assert!(!detection.fallback);
    }

    #[tokio::test]
    async fn superseded_detection_is_discarded() {
        let service = ScanService::new(ScanConfig::default());

        // Two requests are admitted back to back; the older one finishes
        // only after the newer one has already been started.
        let older = service.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let newer = service.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let stale = service
            .run_detection(older, page_photo(160, 120))
            .await
            .expect("detect");
        assert!(stale.is_none(), "stale completion must be discarded");
        assert!(service.latest_detection().is_none());

        let fresh = service
            .run_detection(newer, page_photo(320, 240))
            .await
            .expect("detect");
        assert!(fresh.is_some());

        let latest = service.latest_detection().expect("latest");
        assert_eq!(latest.preview.dimensions(), (320, 240));
    }

    #[tokio::test]
    async fn redraw_tracks_session_corners_without_redetection() {
        let service = ScanService::new(ScanConfig::default());
        let working = page_photo(320, 240);
        service.detect(working.clone()).await.expect("detect");

        let mut session = service.begin_correction().expect("session");
        let viewport = scanwerk_interact::Viewport::new(320.0, 240.0, 320.0, 240.0)
            .expect("viewport");

        let before = service.redraw(&working, &session);
        let grabbed = session.select_near(session.corners().top_left(), &viewport);
        assert!(grabbed.is_some());
        session.move_selected(scanwerk_core::Point2D::new(5.0, 5.0), &viewport);

        let after = service.redraw(&working, &session);
        assert_eq!(after.dimensions(), (320, 240));
        assert_ne!(before.as_raw(), after.as_raw());
    }

    #[tokio::test]
    async fn rectify_and_render_produces_a_document() {
        let service = ScanService::new(ScanConfig::default());
        let corners = CornerQuad::new(
            Point2D::new(53.0, 40.0),
            Point2D::new(266.0, 40.0),
            Point2D::new(266.0, 200.0),
            Point2D::new(53.0, 200.0),
        );

        let document = service
            .rectify_and_render(page_photo(320, 240), corners, StyleConfig::default())
            .await
            .expect("rectify and render");

        assert_eq!(document.dimensions(), (213, 160));
        assert!(document.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[tokio::test]
    async fn degenerate_corners_surface_an_error() {
        let service = ScanService::new(ScanConfig::default());
        let p = Point2D::new(10.0, 10.0);
        let corners = CornerQuad::new(p, p, p, p);

        let err = service
            .rectify_and_render(page_photo(64, 64), corners, StyleConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::DegenerateQuadrilateral(_)));
    }

    #[tokio::test]
    async fn render_auto_skips_rectification() {
        let service = ScanService::new(ScanConfig::default());
        let document = service
            .render_auto(page_photo(100, 80), StyleConfig::default())
            .await
            .expect("render");
        assert_eq!(document.dimensions(), (100, 80));
    }
}
