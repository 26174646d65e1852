//! Marble Contraption entry point
//!
//! In the browser the library's start hook sets up logging and the host page
//! supplies the renderer and physics engine. Natively this runs a short
//! headless session: bootstrap (or restore) the arena, set up a domino run
//! with a goal, drop spheres and report what happened.

#[cfg(not(target_arch = "wasm32"))]
use marble_contraption::Sandbox;
#[cfg(not(target_arch = "wasm32"))]
use marble_contraption::engine::{HeadlessPhysics, HeadlessRender};
#[cfg(not(target_arch = "wasm32"))]
use marble_contraption::sim::ObjectKind;

#[cfg(not(target_arch = "wasm32"))]
type Headless = Sandbox<HeadlessPhysics, HeadlessRender>;

/// Restore the saved arena, or bootstrap a fresh one with the demo layout
///
/// A restored scene already carries the layout from an earlier run, so it is
/// left as it was.
#[cfg(not(target_arch = "wasm32"))]
fn prepare_session(sandbox: &mut Headless) -> bool {
    let restored = sandbox.restore_or_bootstrap();
    if !restored {
        sandbox.add_ten_dominoes();
        for kind in [
            ObjectKind::Ramp,
            ObjectKind::Seesaw,
            ObjectKind::Trampoline,
            ObjectKind::Goal,
        ] {
            sandbox.add(kind);
        }
    }
    log::info!(
        "Arena ready ({}): {} objects",
        if restored { "restored" } else { "fresh" },
        sandbox.scene().len()
    );
    restored
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use marble_contraption::{Settings, Tuning, platform};

    platform::init_logging();
    log::info!("Marble Contraption (native, headless) starting...");

    let mut sandbox = Sandbox::new(
        HeadlessPhysics::new(),
        HeadlessRender::new(),
        platform::session_seed(),
        Tuning::default(),
        Settings::load(),
    );
    prepare_session(&mut sandbox);

    sandbox.set_sphere_count(5);
    if let Err(e) = sandbox.settings().save() {
        log::warn!("Could not save settings: {}", e);
    }
    sandbox.drop_spheres();

    // Ten simulated seconds
    sandbox.run(600);

    let scene = sandbox.scene();
    let goals = scene.ids_of(ObjectKind::Goal);
    let reached = goals
        .iter()
        .filter_map(|&id| scene.get(id))
        .filter(|o| o.is_triggered())
        .count();
    log::info!(
        "After {} frames: {} objects, {}/{} goals reached, {} particles in flight",
        sandbox.frame(),
        scene.len(),
        reached,
        goals.len(),
        scene.fireworks.launches().len() + scene.fireworks.particles().len()
    );

    if let Err(e) = sandbox.save() {
        log::warn!("Could not save scene: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the library's start function
}
