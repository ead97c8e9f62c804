use std::rc::Rc;
use std::sync::Arc;

use winit::window::Window;

use crate::device::Gpu;
use crate::time::FrameClock;

/// Everything an app receives when the runtime is ready.
///
/// The GPU is handed over by value: whoever draws owns it.
pub struct InitCtx {
    pub window: Arc<Window>,
    pub gpu: Gpu,
    pub clock: Rc<FrameClock>,
}
