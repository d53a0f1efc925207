use windows::core::PCWSTR;
use windows::Win32::System::Registry::*;

use crate::native_interop::{wide_str, Color};

const REGISTRY_PATH: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";
const REGISTRY_KEY: &str = "SystemUsesLightTheme";

/// Colours used to paint the banner for one system theme.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub is_dark: bool,
    pub background: Color,
    pub title: Color,
    pub value: Color,
    pub label: Color,
    pub accent: Color,
    pub track: Color,
    pub divider_light: Color,
    pub divider_dark: Color,
}

impl Palette {
    pub fn current() -> Self {
        Self::for_theme(is_dark_mode())
    }

    pub fn for_theme(is_dark: bool) -> Self {
        if is_dark {
            Self {
                is_dark,
                background: Color::from_hex("#1C1C1C"),
                title: Color::from_hex("#888888"),
                value: Color::from_hex("#E6E6E6"),
                label: Color::from_hex("#707070"),
                accent: Color::from_hex("#E0B040"),
                track: Color::from_hex("#444444"),
                divider_light: Color::new(80, 80, 80),
                divider_dark: Color::new(40, 40, 40),
            }
        } else {
            Self {
                is_dark,
                background: Color::from_hex("#F3F3F3"),
                title: Color::from_hex("#404040"),
                value: Color::from_hex("#101010"),
                label: Color::from_hex("#606060"),
                accent: Color::from_hex("#B07810"),
                track: Color::from_hex("#AAAAAA"),
                divider_light: Color::new(160, 160, 160),
                divider_dark: Color::new(230, 230, 230),
            }
        }
    }
}

/// Check if the system is in dark mode by reading the registry
pub fn is_dark_mode() -> bool {
    match read_light_theme_flag() {
        Some(flag) => flag != 1,
        None => true, // Default to dark mode
    }
}

fn read_light_theme_flag() -> Option<u32> {
    unsafe {
        let path = wide_str(REGISTRY_PATH);
        let key_name = wide_str(REGISTRY_KEY);

        let mut hkey = HKEY::default();
        RegOpenKeyExW(
            HKEY_CURRENT_USER,
            PCWSTR::from_raw(path.as_ptr()),
            0,
            KEY_READ,
            &mut hkey,
        )
        .ok()
        .ok()?;

        let mut data: u32 = 0;
        let mut data_size: u32 = std::mem::size_of::<u32>() as u32;
        let result = RegQueryValueExW(
            hkey,
            PCWSTR::from_raw(key_name.as_ptr()),
            None,
            None,
            Some(&mut data as *mut u32 as *mut u8),
            Some(&mut data_size),
        );

        let _ = RegCloseKey(hkey);

        result.ok().ok().map(|_| data)
    }
}
