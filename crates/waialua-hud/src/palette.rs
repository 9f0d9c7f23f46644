//! ---
//! ems_section: "12-gui-setup-wizard"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Mission HUD view model and renderers."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use ratatui::style::Color;
use waialua_core::OperatingMode;

/// Display metadata for one operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePalette {
    pub hex: &'static str,
    pub label: &'static str,
    pub color: Color,
}

const PALETTE: [(OperatingMode, ModePalette); 3] = [
    (
        OperatingMode::Nominal,
        ModePalette {
            hex: "#00FF00",
            label: "LIME",
            color: Color::Rgb(0x00, 0xFF, 0x00),
        },
    ),
    (
        OperatingMode::Degraded,
        ModePalette {
            hex: "#FFD700",
            label: "AMBER",
            color: Color::Rgb(0xFF, 0xD7, 0x00),
        },
    ),
    (
        OperatingMode::Emergency,
        ModePalette {
            hex: "#FF0000",
            label: "RED",
            color: Color::Rgb(0xFF, 0x00, 0x00),
        },
    ),
];

pub fn palette(mode: OperatingMode) -> &'static ModePalette {
    PALETTE
        .iter()
        .find(|(entry, _)| *entry == mode)
        .map(|(_, palette)| palette)
        .unwrap_or(&PALETTE[2].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_an_entry() {
        for mode in OperatingMode::ALL {
            assert!(PALETTE.iter().any(|(entry, _)| *entry == mode));
        }
        assert_eq!(palette(OperatingMode::Nominal).label, "LIME");
        assert_eq!(palette(OperatingMode::Degraded).hex, "#FFD700");
        assert_eq!(palette(OperatingMode::Emergency).label, "RED");
    }
}
