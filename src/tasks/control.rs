use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_time::{Instant, Timer};
use log::{error, info};
use moodbot_host::{ArmingController, SerialLink};

use crate::bench::{CenteredJoystick, LogDisplay};
use crate::tasks::SHUTDOWN;

pub type Controller = ArmingController<SerialLink, SerialLink, CenteredJoystick, LogDisplay>;

#[embassy_executor::task]
async fn control_task(mut controller: Controller) {
    loop {
        let delay = controller.tick(Instant::now());
        if let Either::Second(()) = select(Timer::after(delay), SHUTDOWN.wait()).await {
            break;
        }
    }

    info!("Shutting down");
    controller.shutdown();
    std::process::exit(0);
}

pub fn init(spawner: Spawner, controller: Controller) {
    if let Err(err) = spawner.spawn(control_task(controller)) {
        error!("Failed to spawn control task: {err:?}");
        std::process::exit(1);
    }
}
