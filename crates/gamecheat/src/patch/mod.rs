//! Memory patches kept in place against the game's own overwrites.
//!
//! [`PatchMaintainer`] owns one process accessor and up to three maintenance
//! loops (supply, resources, build speed). Each loop re-applies its patch on a
//! fixed period, re-attaches when the handle went stale and stops by itself
//! once the target process exits. Per-tick write failures are logged and the
//! loop carries on; only process exit or an explicit stop ends it.

mod status;
mod target;

pub use status::StatusFlag;
pub use target::{
    BuildSpeedPatchSpec, MemoryAddress, ResourcePatchSpec, SUPPLY_SPECS, SupplyPatchSpec,
};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use strum::Display;
use tracing::{debug, info, warn};

use crate::config::PatchConfig;
use crate::error::{Error, Result};
use crate::memory::layout::starcraft;
use crate::memory::{ProcessLiveness, ProcessMemory, ensure_attached};
use crate::task::{RepeatingTask, TickOutcome};

/// StarCraft race; each keeps its own supply counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Faction {
    Terran,
    Zerg,
    Protoss,
}

fn lock<M>(memory: &Mutex<M>) -> MutexGuard<'_, M> {
    memory.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write the lifted cap for every faction, collecting the ones that failed
fn apply_supply<M: ProcessMemory + ?Sized>(memory: &mut M, player: u32) -> Vec<Faction> {
    SUPPLY_SPECS
        .iter()
        .filter_map(
            |spec| match spec.apply(&mut *memory, player, starcraft::SUPPLY_MAX_INTERNAL) {
                Ok(()) => None,
                Err(e) => {
                    debug!("{} supply write failed: {}", spec.faction, e);
                    Some(spec.faction)
                }
            },
        )
        .collect()
}

/// Build the tick closure shared by all maintenance loops
fn maintenance_tick<M, L, F>(
    name: &'static str,
    pid: u32,
    memory: Arc<Mutex<M>>,
    liveness: Arc<L>,
    flag: Arc<StatusFlag>,
    mut apply: F,
) -> impl FnMut() -> TickOutcome + Send + 'static
where
    M: ProcessMemory + 'static,
    L: ProcessLiveness + 'static,
    F: FnMut(&mut M) -> Result<()> + Send + 'static,
{
    move || {
        if !liveness.is_alive(pid) {
            info!("Process {} exited, stopping {}", pid, name);
            flag.set(false);
            return TickOutcome::Stop;
        }

        let mut memory = lock(&memory);
        if let Err(e) = ensure_attached(&mut *memory, pid) {
            warn!("{}: re-attach to {} failed: {}", name, pid, e);
            return TickOutcome::Continue;
        }
        if let Err(e) = apply(&mut *memory) {
            warn!("{}: tick failed: {}", name, e);
        }
        TickOutcome::Continue
    }
}

/// Spawn a maintenance loop, lowering `flag` again if the thread cannot start
fn spawn_or_clear<F>(
    name: &'static str,
    period: std::time::Duration,
    tick: F,
    flag: &StatusFlag,
) -> Result<RepeatingTask>
where
    F: FnMut() -> TickOutcome + Send + 'static,
{
    RepeatingTask::spawn(name, period, tick).map_err(|e| {
        flag.set(false);
        Error::from(e)
    })
}

/// Keeps supply, resource and build speed patches applied to one game process.
///
/// All attachment and writes happen under one lock, so the accessor is never
/// used from two loops at once. Dropping the maintainer stops every loop and
/// detaches.
pub struct PatchMaintainer<M, L>
where
    M: ProcessMemory + 'static,
    L: ProcessLiveness + 'static,
{
    memory: Arc<Mutex<M>>,
    liveness: Arc<L>,
    config: PatchConfig,
    supply_active: Arc<StatusFlag>,
    resource_active: Arc<StatusFlag>,
    build_speed_active: Arc<StatusFlag>,
    supply_task: Option<RepeatingTask>,
    resource_task: Option<RepeatingTask>,
    build_speed_task: Option<RepeatingTask>,
}

impl<M, L> PatchMaintainer<M, L>
where
    M: ProcessMemory + 'static,
    L: ProcessLiveness + 'static,
{
    /// Periods below `MIN_PERIOD_MS` are raised to it
    pub fn new(memory: M, liveness: L, config: PatchConfig) -> Self {
        Self {
            memory: Arc::new(Mutex::new(memory)),
            liveness: Arc::new(liveness),
            config: config.sanitized(),
            supply_active: Arc::new(StatusFlag::new()),
            resource_active: Arc::new(StatusFlag::new()),
            build_speed_active: Arc::new(StatusFlag::new()),
            supply_task: None,
            resource_task: None,
            build_speed_task: None,
        }
    }

    /// Supply-cap-removed flag
    pub fn supply_status(&self) -> &StatusFlag {
        &self.supply_active
    }

    /// Resource-boost-active flag
    pub fn resource_status(&self) -> &StatusFlag {
        &self.resource_active
    }

    /// Build-speed-boost-active flag
    pub fn build_speed_status(&self) -> &StatusFlag {
        &self.build_speed_active
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the accessor
    pub fn with_memory<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        f(&mut lock(&self.memory))
    }

    /// Lift the supply cap for `player` and keep it lifted.
    ///
    /// All three factions are patched since the one in play is unknown.
    /// Succeeds only if every faction's writes succeeded; on failure no loop
    /// is started.
    pub fn remove_supply_cap(&mut self, pid: u32, player: u32) -> Result<()> {
        self.stop_task(Task::Supply);

        let failed = {
            let mut memory = lock(&self.memory);
            memory.attach(pid)?;
            apply_supply(&mut *memory, player)
        };
        if !failed.is_empty() {
            warn!("Supply patch incomplete for player {}: {:?}", player, failed);
            return Err(Error::SupplyPatchIncomplete { failed });
        }

        let tick = maintenance_tick(
            "supply-maintainer",
            pid,
            Arc::clone(&self.memory),
            Arc::clone(&self.liveness),
            Arc::clone(&self.supply_active),
            move |memory: &mut M| {
                let failed = apply_supply(memory, player);
                if failed.is_empty() {
                    Ok(())
                } else {
                    Err(Error::SupplyPatchIncomplete { failed })
                }
            },
        );
        // Raised before spawn so the first tick can still clear it
        self.supply_active.set(true);
        self.supply_task = Some(spawn_or_clear(
            "supply-maintainer",
            self.config.supply_period(),
            tick,
            &self.supply_active,
        )?);
        info!("Supply cap removed for player {} in process {}", player, pid);
        Ok(())
    }

    /// Stop the supply loop and put the stock cap back.
    ///
    /// Fails only when the process cannot be attached. The per-faction writes
    /// are best effort; the accessor is detached afterwards.
    pub fn restore_supply_cap(&mut self, pid: u32, player: u32) -> Result<()> {
        self.stop_task(Task::Supply);
        self.supply_active.set(false);

        let mut memory = lock(&self.memory);
        if let Err(e) = ensure_attached(&mut *memory, pid) {
            warn!("Cannot restore supply cap in process {}: {}", pid, e);
            return Err(e);
        }
        for spec in &SUPPLY_SPECS {
            if let Err(e) = spec.restore(&mut *memory, player) {
                warn!("Failed to restore {} supply: {}", spec.faction, e);
            }
        }
        memory.detach();

        info!("Supply cap restored for player {}", player);
        Ok(())
    }

    /// Add to `player`'s minerals and gas once
    pub fn add_resources(&self, pid: u32, player: u32, minerals: i32, gas: i32) -> Result<()> {
        let mut memory = lock(&self.memory);
        ensure_attached(&mut *memory, pid)?;
        let (minerals, gas) =
            ResourcePatchSpec::STARCRAFT.apply(&mut *memory, player, minerals, gas)?;
        debug!("Player {} now has {} minerals, {} gas", player, minerals, gas);
        Ok(())
    }

    /// Add the configured deltas now and again every resource period.
    ///
    /// Only an attach failure aborts; a failed first add is logged and the
    /// loop starts anyway.
    pub fn start_resource_boost(&mut self, pid: u32, player: u32) -> Result<()> {
        lock(&self.memory).attach(pid)?;

        let (minerals, gas) = (self.config.minerals_delta, self.config.gas_delta);
        if let Err(e) = self.add_resources(pid, player, minerals, gas) {
            warn!("Initial resource add for player {} failed: {}", player, e);
        }

        self.stop_task(Task::Resource);
        let tick = maintenance_tick(
            "resource-booster",
            pid,
            Arc::clone(&self.memory),
            Arc::clone(&self.liveness),
            Arc::clone(&self.resource_active),
            move |memory: &mut M| {
                ResourcePatchSpec::STARCRAFT
                    .apply(memory, player, minerals, gas)
                    .map(|_| ())
            },
        );
        self.resource_active.set(true);
        self.resource_task = Some(spawn_or_clear(
            "resource-booster",
            self.config.resource_period(),
            tick,
            &self.resource_active,
        )?);
        info!("Resource boost started for player {} in process {}", player, pid);
        Ok(())
    }

    pub fn stop_resource_boost(&mut self) {
        self.stop_task(Task::Resource);
        if self.resource_active.set(false) {
            info!("Resource boost stopped");
        }
    }

    /// Pin `player`'s build speed to instant construction.
    ///
    /// Only an attach failure aborts; a failed first write is logged and the
    /// loop starts anyway.
    pub fn start_build_speed_boost(&mut self, pid: u32, player: u32) -> Result<()> {
        self.stop_task(Task::BuildSpeed);

        {
            let mut memory = lock(&self.memory);
            ensure_attached(&mut *memory, pid)?;
            if let Err(e) = BuildSpeedPatchSpec::STARCRAFT.apply(&mut *memory, player) {
                warn!("Initial build speed write for player {} failed: {}", player, e);
            }
        }

        let tick = maintenance_tick(
            "build-speed-booster",
            pid,
            Arc::clone(&self.memory),
            Arc::clone(&self.liveness),
            Arc::clone(&self.build_speed_active),
            move |memory: &mut M| BuildSpeedPatchSpec::STARCRAFT.apply(memory, player),
        );
        self.build_speed_active.set(true);
        self.build_speed_task = Some(spawn_or_clear(
            "build-speed-booster",
            self.config.build_speed_period(),
            tick,
            &self.build_speed_active,
        )?);
        info!("Build speed boost started for player {} in process {}", player, pid);
        Ok(())
    }

    /// Stop re-applying build speed. The game's own value is not restored.
    pub fn stop_build_speed_boost(&mut self) {
        self.stop_task(Task::BuildSpeed);
        if self.build_speed_active.set(false) {
            info!("Build speed boost stopped");
        }
    }

    /// Whether the loop for `task` is still scheduled
    fn is_running(&self, task: Task) -> bool {
        self.slot(task).as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn is_supply_loop_running(&self) -> bool {
        self.is_running(Task::Supply)
    }

    pub fn is_resource_loop_running(&self) -> bool {
        self.is_running(Task::Resource)
    }

    pub fn is_build_speed_loop_running(&self) -> bool {
        self.is_running(Task::BuildSpeed)
    }

    /// Stop every loop, clear every flag and detach
    pub fn stop_all(&mut self) {
        for task in [Task::Supply, Task::Resource, Task::BuildSpeed] {
            self.stop_task(task);
        }
        self.supply_active.set(false);
        self.resource_active.set(false);
        self.build_speed_active.set(false);
        lock(&self.memory).detach();
    }

    fn slot(&self, task: Task) -> &Option<RepeatingTask> {
        match task {
            Task::Supply => &self.supply_task,
            Task::Resource => &self.resource_task,
            Task::BuildSpeed => &self.build_speed_task,
        }
    }

    fn stop_task(&mut self, task: Task) {
        let slot = match task {
            Task::Supply => &mut self.supply_task,
            Task::Resource => &mut self.resource_task,
            Task::BuildSpeed => &mut self.build_speed_task,
        };
        if let Some(mut running) = slot.take() {
            running.stop();
        }
    }
}

impl<M, L> Drop for PatchMaintainer<M, L>
where
    M: ProcessMemory + 'static,
    L: ProcessLiveness + 'static,
{
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[derive(Debug, Clone, Copy)]
enum Task {
    Supply,
    Resource,
    BuildSpeed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, MIN_PERIOD_MS};
    use crate::memory::mock::{MockMemory, ScriptedLiveness};
    use std::time::{Duration, Instant};

    const PID: u32 = 4242;

    // Periods below the minimum are raised to it by the maintainer
    fn fast_config() -> PatchConfig {
        EngineConfig::builder()
            .supply_period_ms(10)
            .resource_period_ms(10)
            .build_speed_period_ms(10)
            .resource_deltas(10_000, 10_000)
            .build()
            .patch
    }

    fn maintainer(
        memory: MockMemory,
        liveness: ScriptedLiveness,
    ) -> PatchMaintainer<MockMemory, ScriptedLiveness> {
        PatchMaintainer::new(memory, liveness, fast_config())
    }

    fn wait_until(mut done: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn record(flag: &StatusFlag) -> Arc<Mutex<Vec<bool>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        flag.subscribe(move |value| sink.lock().unwrap().push(value));
        seen
    }

    #[test]
    fn test_remove_supply_cap_writes_max_for_every_faction() {
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID),
            ScriptedLiveness::always_alive(),
        );
        patcher.remove_supply_cap(PID, 0).unwrap();
        assert!(patcher.supply_status().get());

        patcher.with_memory(|memory| {
            for spec in &SUPPLY_SPECS {
                let max = memory.peek_i32(spec.max.for_player(0));
                assert_eq!(max, starcraft::SUPPLY_MAX_INTERNAL);
                assert_eq!(crate::memory::layout::to_displayed_supply(max), 800);
                assert_eq!(
                    memory.read_i32(spec.provided.for_player(0)).unwrap(),
                    starcraft::SUPPLY_MAX_INTERNAL
                );
            }
        });
        patcher.stop_all();
    }

    #[test]
    fn test_remove_supply_cap_attach_failure_starts_nothing() {
        let mut patcher = maintainer(MockMemory::new(), ScriptedLiveness::always_alive());
        let err = patcher.remove_supply_cap(PID, 0).unwrap_err();
        assert!(err.is_access_error());
        assert!(!patcher.supply_status().get());
        assert!(!patcher.is_supply_loop_running());
    }

    #[test]
    fn test_remove_supply_cap_reports_failed_faction() {
        let zerg_max = starcraft::SUPPLY_MAX_ZERG + 4;
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID).with_failing_write(zerg_max),
            ScriptedLiveness::always_alive(),
        );

        let err = patcher.remove_supply_cap(PID, 1).unwrap_err();
        match err {
            Error::SupplyPatchIncomplete { failed } => assert_eq!(failed, vec![Faction::Zerg]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!patcher.supply_status().get());
        assert!(!patcher.is_supply_loop_running());
    }

    #[test]
    fn test_loop_stops_when_process_exits() {
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID),
            ScriptedLiveness::new(&[true, true, false]),
        );
        let seen = record(patcher.supply_status());

        patcher.remove_supply_cap(PID, 0).unwrap();
        wait_until(|| !patcher.is_supply_loop_running());

        assert!(!patcher.is_supply_loop_running());
        assert!(!patcher.supply_status().get());
        assert_eq!(patcher.liveness.calls(), 3);
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);

        // Initial apply plus two maintenance ticks
        let writes = patcher.with_memory(|m| m.writes_to(starcraft::SUPPLY_MAX_TERRAN));
        assert_eq!(writes, 3);
    }

    #[test]
    fn test_dead_process_on_first_tick_clears_flag() {
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID),
            ScriptedLiveness::new(&[false]),
        );
        let seen = record(patcher.supply_status());

        patcher.remove_supply_cap(PID, 0).unwrap();
        wait_until(|| !patcher.is_supply_loop_running());

        assert!(!patcher.is_supply_loop_running());
        assert!(!patcher.supply_status().get());
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_periods_below_minimum_are_raised() {
        let config = PatchConfig {
            supply_period_ms: 0,
            resource_period_ms: 1,
            build_speed_period_ms: 0,
            ..PatchConfig::default()
        };
        let patcher = PatchMaintainer::new(
            MockMemory::new(),
            ScriptedLiveness::always_alive(),
            config,
        );
        assert_eq!(patcher.config().supply_period_ms, MIN_PERIOD_MS);
        assert_eq!(patcher.config().resource_period_ms, MIN_PERIOD_MS);
        assert_eq!(patcher.config().build_speed_period_ms, MIN_PERIOD_MS);
    }

    #[test]
    fn test_tick_reattaches_after_detach() {
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID),
            ScriptedLiveness::always_alive(),
        );
        patcher.remove_supply_cap(PID, 0).unwrap();
        patcher.with_memory(|m| m.detach());

        wait_until(|| patcher.with_memory(|m| m.attach_count() >= 2));
        assert!(patcher.with_memory(|m| m.attach_count()) >= 2);
        patcher.stop_all();
    }

    #[test]
    fn test_restore_supply_cap() {
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID),
            ScriptedLiveness::always_alive(),
        );
        let seen = record(patcher.supply_status());
        patcher.remove_supply_cap(PID, 2).unwrap();
        patcher.restore_supply_cap(PID, 2).unwrap();

        assert!(!patcher.is_supply_loop_running());
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
        patcher.with_memory(|memory| {
            assert!(!memory.is_attached());
            for spec in &SUPPLY_SPECS {
                assert_eq!(
                    memory.peek_i32(spec.max.for_player(2)),
                    starcraft::SUPPLY_DEFAULT_INTERNAL
                );
            }
        });
    }

    #[test]
    fn test_restore_supply_cap_unattachable_process_fails() {
        let mut patcher = maintainer(MockMemory::new(), ScriptedLiveness::always_alive());
        let err = patcher.restore_supply_cap(PID, 0).unwrap_err();
        assert!(err.is_access_error());
        assert!(!patcher.supply_status().get());
        patcher.with_memory(|memory| assert!(memory.writes().is_empty()));
    }

    #[test]
    fn test_add_resources() {
        let minerals = ResourcePatchSpec::STARCRAFT.minerals.for_player(1);
        let gas = ResourcePatchSpec::STARCRAFT.gas.for_player(1);
        let patcher = maintainer(
            MockMemory::new()
                .with_process(PID)
                .with_i32(minerals, 500)
                .with_i32(gas, 20),
            ScriptedLiveness::always_alive(),
        );

        patcher.add_resources(PID, 1, 10_000, 5).unwrap();
        patcher.with_memory(|memory| {
            assert_eq!(memory.peek_i32(minerals), 10_500);
            assert_eq!(memory.peek_i32(gas), 25);
        });
    }

    #[test]
    fn test_add_resources_read_failure_writes_nothing() {
        let patcher = maintainer(
            MockMemory::new().with_process(PID).with_limit(0x1000),
            ScriptedLiveness::always_alive(),
        );
        assert!(patcher.add_resources(PID, 0, 100, 100).is_err());
        patcher.with_memory(|memory| assert!(memory.writes().is_empty()));
    }

    #[test]
    fn test_resource_boost_adds_immediately_and_repeats() {
        let minerals = ResourcePatchSpec::STARCRAFT.minerals.for_player(0);
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID).with_i32(minerals, 50),
            ScriptedLiveness::always_alive(),
        );

        patcher.start_resource_boost(PID, 0).unwrap();
        assert!(patcher.resource_status().get());
        assert!(patcher.with_memory(|m| m.peek_i32(minerals)) >= 10_050);

        wait_until(|| patcher.with_memory(|m| m.peek_i32(minerals)) >= 20_050);
        patcher.stop_resource_boost();

        assert!(!patcher.resource_status().get());
        assert!(!patcher.is_resource_loop_running());
        let total = patcher.with_memory(|m| m.peek_i32(minerals));
        assert!(total >= 20_050);
        assert_eq!((total - 50) % 10_000, 0);
    }

    #[test]
    fn test_resource_boost_starts_when_first_add_fails() {
        let minerals = ResourcePatchSpec::STARCRAFT.minerals.for_player(0);
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID).with_failing_write(minerals),
            ScriptedLiveness::always_alive(),
        );

        patcher.start_resource_boost(PID, 0).unwrap();
        assert!(patcher.resource_status().get());
        assert!(patcher.is_resource_loop_running());
        patcher.stop_resource_boost();
        assert!(!patcher.resource_status().get());
    }

    #[test]
    fn test_resource_boost_attach_failure_starts_nothing() {
        let mut patcher = maintainer(MockMemory::new(), ScriptedLiveness::always_alive());
        assert!(patcher.start_resource_boost(PID, 0).is_err());
        assert!(!patcher.resource_status().get());
        assert!(!patcher.is_resource_loop_running());
    }

    #[test]
    fn test_build_speed_boost() {
        let address = BuildSpeedPatchSpec::STARCRAFT.address.for_player(3);
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID),
            ScriptedLiveness::always_alive(),
        );
        patcher.with_memory(|m| {
            m.attach(PID).unwrap();
            m.poke(address, &[0x2A]);
        });

        patcher.start_build_speed_boost(PID, 3).unwrap();
        assert!(patcher.build_speed_status().get());
        assert_eq!(patcher.with_memory(|m| m.peek_u8(address)), Some(0));

        patcher.stop_build_speed_boost();
        assert!(!patcher.build_speed_status().get());
        assert!(!patcher.is_build_speed_loop_running());
        // No restore on stop
        assert_eq!(patcher.with_memory(|m| m.peek_u8(address)), Some(0));
    }

    #[test]
    fn test_build_speed_boost_starts_when_first_write_fails() {
        let address = BuildSpeedPatchSpec::STARCRAFT.address.for_player(0);
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID).with_failing_write(address),
            ScriptedLiveness::always_alive(),
        );

        patcher.start_build_speed_boost(PID, 0).unwrap();
        assert!(patcher.build_speed_status().get());
        assert!(patcher.is_build_speed_loop_running());
        patcher.stop_build_speed_boost();
        assert!(!patcher.build_speed_status().get());
    }

    #[test]
    fn test_tick_write_failures_do_not_stop_loop() {
        let address = BuildSpeedPatchSpec::STARCRAFT.address.for_player(0);
        let mut patcher = maintainer(
            MockMemory::new().with_process(PID),
            ScriptedLiveness::always_alive(),
        );
        patcher.start_build_speed_boost(PID, 0).unwrap();
        patcher.with_memory(|m| m.set_limit(Some(address)));

        let calls = patcher.liveness.calls();
        wait_until(|| patcher.liveness.calls() >= calls + 3);
        assert!(patcher.is_build_speed_loop_running());
        assert!(patcher.build_speed_status().get());
        patcher.stop_build_speed_boost();
    }

    #[test]
    fn test_drop_detaches() {
        let memory = {
            let mut patcher = maintainer(
                MockMemory::new().with_process(PID),
                ScriptedLiveness::always_alive(),
            );
            patcher.start_build_speed_boost(PID, 0).unwrap();
            Arc::clone(&patcher.memory)
        };
        assert!(!memory.lock().unwrap().is_attached());
    }
}
