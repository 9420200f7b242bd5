//! Headless demo: a small flock wandering around a few obstacles

use steering::prelude::*;

const FLOCK_SIZE: usize = 24;
const FRAMES: u64 = 600;

/// Demo flock with its world and clock
struct DemoFlock {
    world: World,
    agents: Vec<AutonomousAgent>,
    sessions: Vec<SeedReplication>,
    time: Time,
}

impl DemoFlock {
    fn new() -> SteeringResult<Self> {
        let mut world = World::new();
        for (x, z) in [(8.0, 0.0), (-6.0, 5.0), (0.0, -9.0)] {
            world.spawn_obstacle(Vec3::new(x, 0.0, z), Bounds::sphere(1.5), EntityKind::Obstacle);
        }

        let config = AgentConfig {
            max_speed: 4.0,
            max_force: 8.0,
            banking: true,
            behaviors: vec![
                BehaviorConfig::new(BehaviorKind::ObstacleAvoidance).with_weight(3.0),
                BehaviorConfig::new(BehaviorKind::Separation).with_weight(2.0),
                BehaviorConfig::new(BehaviorKind::Alignment),
                BehaviorConfig::new(BehaviorKind::Cohesion).with_weight(0.5),
                BehaviorConfig::new(BehaviorKind::Wander).with_weight(0.8),
            ],
            ..Default::default()
        };

        let mut agents = Vec::with_capacity(FLOCK_SIZE);
        let mut sessions = Vec::with_capacity(FLOCK_SIZE);
        let mut outbox = Vec::new();
        for i in 0..FLOCK_SIZE {
            let angle = i as f32 / FLOCK_SIZE as f32 * std::f32::consts::TAU;
            let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * 4.0;
            let entity = world.spawn_agent(Transform::from_position(position), 0.5, config.max_speed);

            let mut agent = AutonomousAgent::from_config(entity, &config)?;
            let mut session = SeedReplication::new(i as u64, SeedRole::Authority);
            session.start_with_entropy(&mut agent, &mut outbox)?;

            agents.push(agent);
            sessions.push(session);
        }
        log::info!("flock of {FLOCK_SIZE} spawned, {} seeds broadcast", outbox.len());

        Ok(Self {
            world,
            agents,
            sessions,
            time: Time::fixed(1.0 / 60.0),
        })
    }

    fn update(&mut self) -> SteeringResult<()> {
        self.time.update();
        let dt = self.time.delta_seconds();
        for agent in &mut self.agents {
            agent.update(dt, &mut self.world, None)?;
        }
        Ok(())
    }

    fn report(&self) -> SteeringResult<()> {
        let mut centroid = Vec3::ZERO;
        for agent in &self.agents {
            let transform = self
                .world
                .get::<Transform>(agent.entity())
                .map_err(|_| SteeringError::MissingEntity(agent.entity()))?;
            centroid += transform.position;
        }
        centroid /= self.agents.len() as f32;

        let mean_speed =
            self.agents.iter().map(|a| a.speed()).sum::<f32>() / self.agents.len() as f32;
        log::info!(
            "t={:.1}s centroid {centroid:.2} mean speed {mean_speed:.2}",
            self.time.elapsed_seconds()
        );
        Ok(())
    }
}

fn run() -> SteeringResult<()> {
    let mut flock = DemoFlock::new()?;
    log::debug!(
        "seeds: {:?}",
        flock.sessions.iter().filter_map(SeedReplication::seed).collect::<Vec<_>>()
    );

    while flock.time.frame() < FRAMES {
        flock.update()?;
        if flock.time.frame() % 60 == 0 {
            flock.report()?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Steering demo error: {}", e);
    }
}
