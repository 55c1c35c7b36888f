//! 轮换驱动测试
//!
//! 覆盖索引推进的模运算、概率门的统计行为和 Idle/Running 生命周期。

use std::sync::Arc;

use docads::catalog::CatalogSet;
use docads::render::{MemoryRenderer, Placement, Renderer};
use docads::rotation::{FixedRandom, RandomSource, RotationDriver, ThreadRandom};
use docads::session::SessionStore;
use tokio::time::Duration;

fn driver_with(
    random: Arc<dyn RandomSource>,
    probability: f64,
) -> (RotationDriver, Arc<MemoryRenderer>, Arc<SessionStore>) {
    let renderer = Arc::new(MemoryRenderer::new());
    let session = Arc::new(SessionStore::new());
    let driver = RotationDriver::new(
        Arc::new(CatalogSet::default()),
        Arc::clone(&renderer) as Arc<dyn Renderer>,
        Arc::clone(&session),
        random,
        Duration::from_secs(30),
        probability,
    );
    (driver, renderer, session)
}

#[test]
fn test_sidebar_index_follows_n_mod_len_for_many_ticks() {
    let (driver, _, _) = driver_with(Arc::new(FixedRandom::always(0.99)), 0.3);
    let sidebar_len = CatalogSet::default().sidebar.len();

    assert_eq!(driver.state().sidebar_index, 0);
    for n in 1..=257 {
        driver.tick();
        assert_eq!(driver.state().sidebar_index, n % sidebar_len);
    }
}

#[test]
fn test_footer_index_stays_put_when_gate_never_passes() {
    let (driver, _, _) = driver_with(Arc::new(FixedRandom::always(0.5)), 0.3);
    for _ in 0..50 {
        driver.tick();
    }
    assert_eq!(driver.state().footer_index, 0);
}

#[test]
fn test_footer_index_advances_every_tick_at_probability_one() {
    let (driver, _, _) = driver_with(Arc::new(FixedRandom::always(0.5)), 1.0);
    let footer_len = CatalogSet::default().footer.len();
    for n in 1..=10 {
        driver.tick();
        assert_eq!(driver.state().footer_index, n % footer_len);
    }
}

#[test]
fn test_gate_advance_rate_converges() {
    let (driver, _, _) = driver_with(Arc::new(ThreadRandom), 0.3);
    const TICKS: usize = 20_000;

    // 底部目录长度为 2，每次推进必然翻转索引
    let mut advances = 0usize;
    let mut prev = driver.state().footer_index;
    for _ in 0..TICKS {
        driver.tick();
        let cur = driver.state().footer_index;
        if cur != prev {
            advances += 1;
        }
        prev = cur;
    }

    let rate = advances as f64 / TICKS as f64;
    assert!(
        (rate - 0.3).abs() < 0.02,
        "observed advance rate {} too far from configured 0.3",
        rate
    );
}

#[test]
fn test_tick_rerenders_visible_placements_only() {
    let (driver, renderer, session) = driver_with(Arc::new(FixedRandom::always(0.0)), 1.0);

    driver.tick();
    assert_eq!(renderer.render_count(Placement::Sidebar), 1);
    assert_eq!(renderer.render_count(Placement::Footer), 1);

    session.dismiss(Placement::Footer);
    driver.tick();
    assert_eq!(renderer.render_count(Placement::Sidebar), 2);
    // 关闭后不再重绘
    assert_eq!(renderer.render_count(Placement::Footer), 1);
}

#[test]
fn test_rendered_markup_tracks_current_entry() {
    let (driver, renderer, _) = driver_with(Arc::new(FixedRandom::always(0.99)), 0.3);
    let catalogs = CatalogSet::default();

    driver.tick();
    let html = renderer.html(Placement::Sidebar).unwrap();
    let expected_entry = catalogs.sidebar.get(1);
    assert!(html.contains(&format!(r#"data-ad-id="{}""#, expected_entry.id)));
    assert!(html.contains(&expected_entry.title));
}

#[tokio::test]
async fn test_background_task_ticks_on_interval() {
    let renderer = Arc::new(MemoryRenderer::new());
    let driver = RotationDriver::new(
        Arc::new(CatalogSet::default()),
        Arc::clone(&renderer) as Arc<dyn Renderer>,
        Arc::new(SessionStore::new()),
        Arc::new(FixedRandom::always(0.99)),
        Duration::from_millis(10),
        0.3,
    );

    driver.start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    driver.stop();

    let ticks = driver.state().sidebar_index;
    let renders = renderer.render_count(Placement::Sidebar);
    assert!(renders > 0, "background task never ticked");
    // 停止后不再推进
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(driver.state().sidebar_index, ticks);
}

#[tokio::test]
async fn test_start_twice_keeps_single_task() {
    let (driver, _, _) = driver_with(Arc::new(FixedRandom::always(0.99)), 0.3);
    driver.start();
    driver.start();
    assert!(driver.is_running());
    driver.stop();
    assert!(!driver.is_running());
}
