use crate::cli::{ArgPolicy, CommandDescriptor, CommandRegistry, Handler, RegistrationError};
use libvessel::EngineMode;

/// Version string for vessel, libvessel and the active engine mode
pub fn get_version_string(mode: EngineMode) -> String {
    format!(
        "vessel {}\nlibvessel {}\nengine mode: {}",
        env!("CARGO_PKG_VERSION"),
        libvessel::version(),
        mode
    )
}

pub fn register(registry: &mut CommandRegistry) -> Result<(), RegistrationError> {
    registry.register(
        CommandDescriptor::new("version")
            .short("Display version information")
            .args(ArgPolicy::None)
            .handler(Handler::new(|ctx, _| {
                println!("{}", get_version_string(ctx.mode));
                Ok(())
            }))
            .modes(EngineMode::ALL),
    )
}
