use rgb_sync_core::{Device, DeviceClass, Discovery, MouseKind, PoolConfig, Result};
use tracing::{debug, info, warn};

use crate::{LightController, ZoneDevice};

/// One controller exposed by the vendor SDK. Only keyboards are typed by the
/// SDK itself, everything else is told apart by name.
pub struct SdkDevice {
    pub is_keyboard: bool,
    pub controller: Box<dyn LightController>,
}

/// Enumerates the controllers a vendor SDK currently exposes
pub trait ControllerSource {
    fn controllers(&mut self) -> Result<Vec<SdkDevice>>;
}

/// Class of an SDK device from its keyboard flag and name
pub fn classify(name: &str, is_keyboard: bool, mouse: MouseKind) -> DeviceClass {
    let name = name.to_lowercase();
    if is_keyboard {
        DeviceClass::Keyboard
    } else if name.contains("mouse") {
        DeviceClass::Mouse(mouse)
    } else if name.contains("vga") {
        DeviceClass::Gpu
    } else {
        DeviceClass::Generic
    }
}

/// [`Discovery`] over a vendor SDK. Mice take their zone layout from the
/// configured mouse preference.
pub struct AuraDiscovery<S> {
    source: S,
}

impl<S: ControllerSource> AuraDiscovery<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: ControllerSource> Discovery for AuraDiscovery<S> {
    fn discover(&mut self, config: &PoolConfig) -> Vec<Box<dyn Device>> {
        let controllers = match self.source.controllers() {
            Ok(controllers) => controllers,
            Err(e) => {
                warn!("aura sdk unavailable: {e}");
                return Vec::new();
            },
        };
        controllers
            .into_iter()
            .filter_map(|SdkDevice { is_keyboard, controller }| {
                let class = classify(controller.name(), is_keyboard, config.mouse_preference);
                if !config.enables(class) {
                    debug!(controller = controller.name(), "{} disabled", class.as_str());
                    return None;
                }
                info!(controller = controller.name(), "found aura {}", class.as_str());
                Some(Box::new(ZoneDevice::new(controller, class)) as Box<dyn Device>)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rgb_sync_core::DeviceError;

    use super::*;
    use crate::tests::Recorder;

    struct Fixed(Vec<(&'static str, bool)>);

    impl ControllerSource for Fixed {
        fn controllers(&mut self) -> Result<Vec<SdkDevice>> {
            Ok(self
                .0
                .iter()
                .map(|&(name, is_keyboard)| {
                    let mut controller = Recorder::new(3);
                    controller.name = name;
                    SdkDevice {
                        is_keyboard,
                        controller: Box::new(controller),
                    }
                })
                .collect())
        }
    }

    struct Missing;

    impl ControllerSource for Missing {
        fn controllers(&mut self) -> Result<Vec<SdkDevice>> {
            Err(DeviceError::DeviceNotFound)
        }
    }

    fn classes(devices: &[Box<dyn Device>]) -> Vec<DeviceClass> {
        devices.iter().map(|d| d.class()).collect()
    }

    #[test]
    fn keyboard_flag_wins_over_name() {
        let class = classify("Claymore Mouse Pad", true, MouseKind::Standard);
        assert_eq!(class, DeviceClass::Keyboard);
    }

    #[test]
    fn mouse_by_name() {
        assert_eq!(
            classify("ROG Gladius MOUSE", false, MouseKind::Standard),
            DeviceClass::Mouse(MouseKind::Standard)
        );
        assert_eq!(
            classify("pugio mouse", false, MouseKind::Pugio),
            DeviceClass::Mouse(MouseKind::Pugio)
        );
    }

    #[test]
    fn gpu_by_name() {
        assert_eq!(classify("Strix VGA", false, MouseKind::Standard), DeviceClass::Gpu);
    }

    #[test]
    fn everything_else_is_generic() {
        assert_eq!(classify("Aura Strip", false, MouseKind::Standard), DeviceClass::Generic);
    }

    #[test]
    fn classes_follow_config() {
        let mut discovery = AuraDiscovery::new(Fixed(vec![
            ("Claymore", true),
            ("Pugio Mouse", false),
            ("Strix VGA", false),
            ("Addressable Strip", false),
        ]));
        let config = PoolConfig {
            gpu: false,
            mouse_preference: MouseKind::Pugio,
            ..Default::default()
        };
        let devices = discovery.discover(&config);
        assert_eq!(classes(&devices), [
            DeviceClass::Keyboard,
            DeviceClass::Mouse(MouseKind::Pugio),
            DeviceClass::Generic,
        ]);
        assert_eq!(devices[1].updates_per_second(), 15.0);
        assert_eq!(devices[2].name(), "Addressable Strip");
    }

    #[test]
    fn missing_sdk_finds_nothing() {
        let mut discovery = AuraDiscovery::new(Missing);
        assert!(discovery.discover(&PoolConfig::default()).is_empty());
    }
}
