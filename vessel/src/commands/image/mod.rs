use crate::cli::{CommandDescriptor, CommandRegistry, RegistrationError, TextRewrite, derive_alias};
use libvessel::EngineMode;

pub mod list;

/// Registers `image`, `image list` and the top-level `images` alias.
pub fn register(registry: &mut CommandRegistry) -> Result<(), RegistrationError> {
    let list = list::descriptor()?;
    let images = derive_alias(
        &list,
        &TextRewrite::first("list", "images"),
        &TextRewrite::all("vessel image list", "vessel images"),
    );

    registry.register(group())?;
    registry.register(list)?;
    registry.register(images)
}

fn group() -> CommandDescriptor {
    CommandDescriptor::new("image")
        .short("Manage images")
        .long("Manage images")
        .modes(EngineMode::ALL)
}
