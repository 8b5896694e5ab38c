//! Audio device listing command.

use crate::player::{default_audio_device, list_audio_devices};

/// List audio output devices, marking the default and the configured one
pub fn cmd_devices(configured: &str) -> anyhow::Result<()> {
    let devices = list_audio_devices();
    if devices.is_empty() {
        println!("No audio output devices found");
        return Ok(());
    }

    let default = default_audio_device();
    for name in &devices {
        let marker = if !configured.is_empty() && name == configured {
            '>'
        } else if default.as_deref() == Some(name.as_str()) {
            '*'
        } else {
            ' '
        };
        println!("{} {}", marker, name);
    }

    if !configured.is_empty() && !devices.iter().any(|d| d == configured) {
        tracing::warn!("Configured output device {:?} is not available", configured);
    }
    println!("\n* default   > configured");
    Ok(())
}
