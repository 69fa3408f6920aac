// Thin binary wiring the control plane library to the stub collaborator
// (the real SH-2 core is out of scope here). Boots logging, activates
// the control plane, then plays the role of "the emulator thread" driving
// frame ticks and instruction-hook invocations the way a real
// mednafen-saturn core would from its own CPU loop.

use ss_dbgbridge::config::Config;
use ss_dbgbridge::control::{ack, frame, hooks_mgr, instruction, ControlState};
use ss_dbgbridge::stub_emu::{PlaceholderEncoder, StubEmu};

fn main() {
    env_logger::init();

    let config = Config::load();
    log::info!(
        "starting control plane: base_dir={} poll_interval={:?}",
        config.base_dir.display(),
        config.poll_interval,
    );

    let mut state = match ControlState::activate(&config.base_dir, config.poll_interval) {
        Ok(s) => s,
        Err(e) => {
            log::error!("failed to activate control plane: {e}");
            std::process::exit(1);
        }
    };
    let mut emu = StubEmu::new();
    let encoder = PlaceholderEncoder;

    ack::write(&mut state, &emu, "ready frame=0");
    hooks_mgr::recompute(&mut state, &mut emu);

    log::info!("entering emulator loop");

    while state.active {
        frame::tick(&mut state, &mut emu, &encoder);
        frame::spin_while_paused(&mut state, &mut emu);

        if !state.active {
            break;
        }

        if state.hook_enabled {
            let pc = emu.master_pc();
            instruction::on_instruction(&mut state, &mut emu, pc);
        }
        emu.tick_cycles(1);
    }

    log::info!("control plane shut down");
}
