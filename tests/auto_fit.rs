use std::time::Duration;

use rfresume::{AutoFit, Engine, EngineConfig, SurfaceConfig};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[tokio::test(start_paused = true)]
async fn initial_fit_is_published_on_attach() {
    let fit = AutoFit::spawn(SurfaceConfig::default(), 834.0).unwrap();
    assert!(close(fit.scale(), 1.0));
}

#[tokio::test(start_paused = true)]
async fn resize_burst_is_coalesced() {
    let fit = AutoFit::spawn(SurfaceConfig::default(), 834.0).unwrap();
    let mut scales = fit.subscribe();

    // Settle refit after attach.
    tokio::time::sleep(Duration::from_millis(150)).await;
    scales.borrow_and_update();

    for width in [300.0, 500.0, 700.0, 437.0] {
        fit.resize(width);
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
    // Still inside the quiet period of the last event.
    assert!(!scales.has_changed().unwrap());
    assert!(close(fit.scale(), 1.0));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(scales.has_changed().unwrap());
    assert!(close(*scales.borrow_and_update(), 0.5));
}

#[tokio::test(start_paused = true)]
async fn fit_is_capped_below_manual_max() {
    let fit = AutoFit::spawn(SurfaceConfig::default(), 834.0).unwrap();
    fit.resize(4000.0);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(close(fit.scale(), 1.2));

    fit.resize(10.0);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(close(fit.scale(), 0.3));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_listener_stops_updates() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let fit = engine.auto_fit(834.0).unwrap();
    let mut scales = fit.subscribe();
    drop(fit);
    tokio::time::sleep(Duration::from_millis(10)).await;
    // The publishing side went away with the task.
    assert!(scales.changed().await.is_err());
}
