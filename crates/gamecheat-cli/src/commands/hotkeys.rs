//! Hotkey command.

use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use anyhow::Result;
use gamecheat::{EngineConfig, GameKind};

use crate::cli::HotKeyArgs;

/// Register every binding and run cheats on key presses until Ctrl+C or
/// game exit
#[cfg(target_os = "windows")]
pub fn run(config: &EngineConfig, game: GameKind, args: &HotKeyArgs) -> Result<()> {
    use std::time::Duration;

    use anyhow::bail;
    use gamecheat::{
        CheatExecutor, HotKeyRegistrar, ProcessLiveness, RepeatingTask, SendInputDriver,
        SystemProcesses, TickOutcome, Win32HotKeyHost, Win32Windows, current_thread_id,
        post_quit, run_message_loop,
    };
    use tracing::{error, info, warn};

    use crate::bindings;

    let bindings = bindings::load(&args.bindings)?;
    let window = super::resolve_window(&args.target)?;
    let pid = args.target.pid;

    let mut registrar = HotKeyRegistrar::new(Win32HotKeyHost::for_current_thread());
    for binding in &bindings {
        let mut hotkey = binding.hotkey.clone();
        if let Err(e) = registrar.register(&mut hotkey) {
            warn!("Skipping binding {}: {}", binding.hotkey, e);
        }
    }
    if registrar.is_empty() {
        bail!("No hotkey could be registered");
    }

    let cheats: Vec<String> = bindings.into_iter().map(|b| b.cheat).collect();
    let executor = CheatExecutor::new(Win32Windows, SendInputDriver, config);
    let (queue, worker) = spawn_cheat_worker(move |cheat| {
        if let Err(e) = executor.execute_cheat_blocking(&cheat, window) {
            error!("Cheat {:?} failed: {}", cheat, e);
        }
    })?;
    registrar.on_hotkey(move |hotkey| {
        let Some(cheat) = hotkey
            .binding
            .as_deref()
            .and_then(|index| index.parse::<usize>().ok())
            .and_then(|index| cheats.get(index))
        else {
            return;
        };
        if queue.send(cheat.clone()).is_err() {
            warn!("Cheat worker is gone, dropping hotkey {}", hotkey);
        }
    });

    eprintln!("{} window: {}", game, window);
    for hotkey in registrar.registered() {
        eprintln!("  {}", hotkey);
    }
    eprintln!("{} hotkeys active. Press Ctrl+C to quit.", registrar.len());

    let main_thread = current_thread_id();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        if let Err(e) = post_quit(main_thread) {
            error!("Failed to stop message loop: {}", e);
        }
    })?;

    let _watch = RepeatingTask::spawn("game-watch", Duration::from_secs(1), move || {
        if SystemProcesses.is_alive(pid) {
            return TickOutcome::Continue;
        }
        info!("Process {} exited", pid);
        if let Err(e) = post_quit(main_thread) {
            error!("Failed to stop message loop: {}", e);
        }
        TickOutcome::Stop
    })?;

    run_message_loop(&registrar)?;

    let released = registrar.unregister_all();
    // Drops the queue sender, which ends the worker
    registrar.detach();
    if worker.join().is_err() {
        error!("Cheat worker panicked");
    }
    eprintln!("Released {} hotkeys", released);
    Ok(())
}

/// Run queued cheats one at a time off the message loop thread.
///
/// The worker exits once every sender is dropped.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn spawn_cheat_worker<F>(mut run: F) -> std::io::Result<(Sender<String>, JoinHandle<()>)>
where
    F: FnMut(String) + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<String>();
    let handle = std::thread::Builder::new()
        .name("cheat-worker".to_string())
        .spawn(move || {
            for cheat in rx {
                run(cheat);
            }
        })?;
    Ok((tx, handle))
}

#[cfg(not(target_os = "windows"))]
pub fn run(_config: &EngineConfig, game: GameKind, _args: &HotKeyArgs) -> Result<()> {
    anyhow::bail!("Global hotkeys for {} require Windows", game)
}
