//! Goal detection and firework particles
//!
//! A goal fires once: the first sphere inside its volume starts a launch
//! particle at the goal mouth. The launch climbs until it reaches a random
//! altitude, then bursts into an explosion of same-coloured particles that
//! fall, fade and shrink over a fixed number of ticks.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::{PI, TAU};

use super::kind::ObjectKind;
use super::object::KindState;
use super::scene::Scene;
use super::uniform;
use crate::consts::{GOAL_DEPTH, GOAL_HEIGHT, GOAL_WIDTH};
use crate::engine::{MaterialId, NodeDesc, NodeHandle, PhysicsWorld, RenderScene, Shape};
use crate::tuning::FireworkTuning;

const PARTICLE_RADIUS: f32 = 0.15;
const LAUNCH_COLOR: MaterialId = MaterialId(0xffffff);

/// Climbing particle that bursts at its target altitude
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParticle {
    pub node: NodeHandle,
    pub position: Vec3,
    pub velocity: Vec3,
    pub target_altitude: f32,
    /// Colour of the explosion it will become
    pub color: MaterialId,
}

/// One fragment of an explosion
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionParticle {
    pub node: NodeHandle,
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: MaterialId,
    /// Ticks left
    pub life: u32,
    pub max_life: u32,
}

impl ExplosionParticle {
    /// Opacity for the current life; 1 until the final `fade` fraction
    pub fn opacity(&self, fade: f32) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        let ratio = self.life as f32 / self.max_life as f32;
        if ratio < fade && fade > 0.0 {
            ratio / fade
        } else {
            1.0
        }
    }
}

/// Every in-flight launch and explosion particle
#[derive(Debug, Clone, Default)]
pub struct Fireworks {
    launches: Vec<LaunchParticle>,
    particles: Vec<ExplosionParticle>,
}

impl Fireworks {
    pub fn launches(&self) -> &[LaunchParticle] {
        &self.launches
    }

    pub fn particles(&self) -> &[ExplosionParticle] {
        &self.particles
    }

    pub fn is_idle(&self) -> bool {
        self.launches.is_empty() && self.particles.is_empty()
    }

    /// Start one launch from `origin`
    pub fn launch(
        &mut self,
        render: &mut dyn RenderScene,
        rng: &mut Pcg32,
        tuning: &FireworkTuning,
        origin: Vec3,
    ) {
        let color = match tuning.palette.len() {
            0 => LAUNCH_COLOR,
            n => MaterialId(tuning.palette[rng.random_range(0..n)]),
        };
        let target_altitude = origin.y + uniform(rng, tuning.altitude_min, tuning.altitude_max);
        let node = render.create_node(&NodeDesc::new(
            Shape::Ball {
                radius: PARTICLE_RADIUS,
            },
            origin,
            LAUNCH_COLOR,
        ));
        self.launches.push(LaunchParticle {
            node,
            position: origin,
            velocity: Vec3::Y * tuning.launch_speed,
            target_altitude,
            color,
        });
    }

    /// Advance every particle by one tick of `dt` seconds
    ///
    /// Returns the number of launches that burst this tick.
    pub fn update(
        &mut self,
        render: &mut dyn RenderScene,
        rng: &mut Pcg32,
        tuning: &FireworkTuning,
        dt: f32,
    ) -> usize {
        let mut bursts = Vec::new();
        self.launches.retain_mut(|launch| {
            launch.position += launch.velocity * dt;
            launch.velocity.y += tuning.gravity * dt;
            // A climb that stalls short of its target bursts at the apex
            let done = launch.position.y >= launch.target_altitude || launch.velocity.y <= 0.0;
            if done {
                render.destroy_node(launch.node);
                bursts.push((launch.position, launch.color));
            } else {
                render.set_transform(launch.node, launch.position, glam::Quat::IDENTITY);
            }
            !done
        });

        self.particles.retain_mut(|p| {
            if p.life == 0 {
                render.destroy_node(p.node);
                return false;
            }
            p.position += p.velocity * dt;
            p.velocity.y += tuning.gravity * dt;
            p.life -= 1;
            let opacity = p.opacity(tuning.fade_fraction);
            render.set_transform(p.node, p.position, glam::Quat::IDENTITY);
            render.set_opacity(p.node, opacity);
            render.set_scale(p.node, tuning.min_scale + (1.0 - tuning.min_scale) * opacity);
            true
        });

        for &(at, color) in &bursts {
            self.explode(render, rng, tuning, at, color);
        }
        bursts.len()
    }

    fn explode(
        &mut self,
        render: &mut dyn RenderScene,
        rng: &mut Pcg32,
        tuning: &FireworkTuning,
        at: Vec3,
        color: MaterialId,
    ) {
        log::debug!(
            "Firework burst at ({:.1}, {:.1}, {:.1}) colour {:06x}",
            at.x,
            at.y,
            at.z,
            color.0
        );
        self.particles.reserve(tuning.particles_per_explosion);
        for _ in 0..tuning.particles_per_explosion {
            let azimuth = uniform(rng, 0.0, TAU);
            let elevation = uniform(rng, -0.5 * PI, 0.5 * PI);
            let speed = uniform(rng, tuning.speed_min, tuning.speed_max);
            let velocity = Vec3::new(
                azimuth.cos() * elevation.cos(),
                elevation.sin(),
                azimuth.sin() * elevation.cos(),
            ) * speed;
            let node = render.create_node(&NodeDesc::new(
                Shape::Ball {
                    radius: PARTICLE_RADIUS,
                },
                at,
                color,
            ));
            self.particles.push(ExplosionParticle {
                node,
                position: at,
                velocity,
                color,
                life: tuning.lifetime_ticks,
                max_life: tuning.lifetime_ticks,
            });
        }
    }

    /// Drop every particle and release its node
    pub fn clear(&mut self, render: &mut dyn RenderScene) {
        for launch in self.launches.drain(..) {
            render.destroy_node(launch.node);
        }
        for particle in self.particles.drain(..) {
            render.destroy_node(particle.node);
        }
    }
}

/// Whether `point` lies inside the goal volume of a goal body centred at `center`
pub fn in_goal_volume(center: Vec3, point: Vec3) -> bool {
    let base = center.y - GOAL_HEIGHT * 0.5;
    (point.x - center.x).abs() < GOAL_WIDTH * 0.5
        && (point.z - center.z).abs() < GOAL_DEPTH * 0.5
        && point.y > base
        && point.y < base + GOAL_HEIGHT
}

/// Fire every untriggered goal that holds a sphere; returns how many fired
pub fn check_goals(
    scene: &mut Scene,
    physics: &dyn PhysicsWorld,
    render: &mut dyn RenderScene,
) -> usize {
    let spheres: Vec<Vec3> = scene
        .objects()
        .iter()
        .filter(|o| o.kind == ObjectKind::Sphere)
        .filter_map(|o| physics.pose(o.body).map(|(p, _)| p))
        .collect();
    if spheres.is_empty() {
        return 0;
    }

    let mut mouths = Vec::new();
    for object in scene.objects_mut() {
        let KindState::Triggerable { triggered } = &mut object.state else {
            continue;
        };
        if *triggered {
            continue;
        }
        let Some((center, _)) = physics.pose(object.body) else {
            continue;
        };
        if spheres.iter().any(|&s| in_goal_volume(center, s)) {
            *triggered = true;
            mouths.push(center + Vec3::Y * GOAL_HEIGHT * 0.5);
        }
    }

    for &mouth in &mouths {
        log::info!("Goal reached at ({:.1}, {:.1})", mouth.x, mouth.z);
        scene
            .fireworks
            .launch(render, &mut scene.rng, &scene.tuning.fireworks, mouth);
        render.show_banner("Goal!");
    }
    mouths.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{HeadlessPhysics, HeadlessRender};
    use crate::settings::Settings;
    use crate::sim::object::BuildParams;
    use crate::tuning::Tuning;
    use rand::SeedableRng;

    #[test]
    fn test_goal_volume_bounds() {
        let center = Vec3::new(0.0, 0.5, 0.0);
        assert!(in_goal_volume(center, Vec3::new(0.5, 0.3, -0.5)));
        assert!(!in_goal_volume(center, Vec3::new(1.0, 0.3, 0.0)));
        assert!(!in_goal_volume(center, Vec3::new(0.0, 0.0, 0.0)));
        assert!(!in_goal_volume(center, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_opacity_fades_in_final_fraction() {
        let mut p = ExplosionParticle {
            node: NodeHandle(0),
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            color: MaterialId(0),
            life: 400,
            max_life: 400,
        };
        assert_eq!(p.opacity(0.3), 1.0);
        p.life = 120;
        assert_eq!(p.opacity(0.3), 1.0);
        p.life = 60;
        assert!((p.opacity(0.3) - 0.5).abs() < 1e-5);
        p.life = 0;
        assert_eq!(p.opacity(0.3), 0.0);
    }

    #[test]
    fn test_launch_bursts_into_one_coloured_batch() {
        let mut render = HeadlessRender::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let tuning = FireworkTuning::default();
        let mut fireworks = Fireworks::default();
        fireworks.launch(&mut render, &mut rng, &tuning, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(fireworks.launches().len(), 1);

        let mut bursts = 0;
        for _ in 0..600 {
            bursts += fireworks.update(&mut render, &mut rng, &tuning, 1.0 / 60.0);
            if bursts > 0 {
                break;
            }
        }
        assert_eq!(bursts, 1);
        assert!(fireworks.launches().is_empty());
        assert_eq!(fireworks.particles().len(), tuning.particles_per_explosion);
        let color = fireworks.particles()[0].color;
        assert!(tuning.palette.contains(&color.0));
        assert!(fireworks.particles().iter().all(|p| p.color == color));
        assert_eq!(render.node_count(), tuning.particles_per_explosion);
    }

    #[test]
    fn test_particles_expire_and_release_nodes() {
        let mut render = HeadlessRender::new();
        let mut rng = Pcg32::seed_from_u64(9);
        let tuning = FireworkTuning {
            particles_per_explosion: 5,
            lifetime_ticks: 10,
            ..FireworkTuning::default()
        };
        let mut fireworks = Fireworks::default();
        fireworks.explode(
            &mut render,
            &mut rng,
            &tuning,
            Vec3::new(0.0, 10.0, 0.0),
            MaterialId(0xff0000),
        );
        assert_eq!(render.node_count(), 5);

        for _ in 0..10 {
            fireworks.update(&mut render, &mut rng, &tuning, 1.0 / 60.0);
        }
        let node = fireworks.particles()[0].node;
        assert_eq!(render.opacity(node), Some(0.0));
        assert!((render.scale(node).unwrap() - tuning.min_scale).abs() < 1e-5);

        fireworks.update(&mut render, &mut rng, &tuning, 1.0 / 60.0);
        assert!(fireworks.is_idle());
        assert_eq!(render.node_count(), 0);
    }

    #[test]
    fn test_stalled_launch_bursts_at_apex() {
        let mut render = HeadlessRender::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = FireworkTuning {
            launch_speed: 1.0,
            ..FireworkTuning::default()
        };
        let mut fireworks = Fireworks::default();
        fireworks.launch(&mut render, &mut rng, &tuning, Vec3::ZERO);
        let mut bursts = 0;
        for _ in 0..120 {
            bursts += fireworks.update(&mut render, &mut rng, &tuning, 1.0 / 60.0);
        }
        assert_eq!(bursts, 1);
    }

    #[test]
    fn test_goal_fires_once() {
        let mut scene = Scene::new(2, Tuning::default(), Settings::default());
        let mut physics = HeadlessPhysics::new();
        let mut render = HeadlessRender::new();
        let goal = scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Goal,
            Vec3::ZERO,
            &BuildParams::None,
        );
        scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Sphere,
            Vec3::new(0.2, 0.4, 0.0),
            &BuildParams::None,
        );
        scene.spawn(
            &mut physics,
            &mut render,
            ObjectKind::Sphere,
            Vec3::new(-0.2, 0.4, 0.0),
            &BuildParams::None,
        );

        assert_eq!(check_goals(&mut scene, &physics, &mut render), 1);
        assert!(scene.get(goal).unwrap().is_triggered());
        assert_eq!(scene.fireworks.launches().len(), 1);
        for _ in 0..50 {
            assert_eq!(check_goals(&mut scene, &physics, &mut render), 0);
        }
        assert_eq!(scene.fireworks.launches().len(), 1);
        assert_eq!(render.banners(), &["Goal!".to_string()]);
    }
}
