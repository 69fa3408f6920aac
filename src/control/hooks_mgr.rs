// Hook activation manager. The sole writer of `hook_enabled` and the
// collaborator's installed callback. `recompute` is idempotent and must
// be called after any state change that could affect the hook-activation
// invariant (hook_enabled iff step armed, breakpoints non-empty, any
// per-instruction trace armed, or a run-to-cycle target pending).

use crate::control::state::ControlState;
use crate::hooks::EmulatorHooks;

pub fn recompute(state: &mut ControlState, emu: &mut dyn EmulatorHooks) {
    let wants = state.wants_hook();
    if wants != state.hook_enabled {
        emu.enable_cpu_hook(wants);
        state.hook_enabled = wants;
    }
}
