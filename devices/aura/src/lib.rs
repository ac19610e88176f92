//! Zone lighting devices driven through an Aura style vendor SDK.
//!
//! The vendor SDK is reduced to the [`LightController`] trait. A
//! [`ZoneDevice`] wraps one controller and picks how frame colors are spread
//! over its lights from the device class.

use rgb_sync_core::{
    CancellationToken, ColorFrame, Device, DeviceClass, DeviceError, LogicalKey, MouseKind,
    Result, Rgb,
};

mod discovery;
pub mod keycodes;

pub use discovery::{classify, AuraDiscovery, ControllerSource, SdkDevice};

/// Manual color mode, the only mode frames are painted in
pub const MANUAL_MODE: u32 = 0;

/// Pugio light order
pub const PUGIO_ZONES: [LogicalKey; 3] = [
    LogicalKey::PeripheralLogo,
    LogicalKey::PeripheralScrollWheel,
    LogicalKey::PeripheralFrontLight,
];

/// One vendor controlled device. Colors are staged with `set_light` or
/// `set_key` and only shown after `apply`.
pub trait LightController: Send {
    fn name(&self) -> &str;

    fn light_count(&self) -> usize;

    fn set_mode(&mut self, mode: u32) -> Result<()>;

    fn set_light(&mut self, index: usize, color: Rgb) -> Result<()>;

    /// Stage a keyboard key by vendor key code. Returns false when the
    /// controller has no such key.
    fn set_key(&mut self, _code: u16, _color: Rgb) -> Result<bool> {
        Ok(false)
    }

    fn apply(&mut self) -> Result<()>;
}

impl<C: LightController + ?Sized> LightController for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn light_count(&self) -> usize {
        (**self).light_count()
    }

    fn set_mode(&mut self, mode: u32) -> Result<()> {
        (**self).set_mode(mode)
    }

    fn set_light(&mut self, index: usize, color: Rgb) -> Result<()> {
        (**self).set_light(index, color)
    }

    fn set_key(&mut self, code: u16, color: Rgb) -> Result<bool> {
        (**self).set_key(code, color)
    }

    fn apply(&mut self) -> Result<()> {
        (**self).apply()
    }
}

/// Where staged colors go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Key(u16),
    Light(usize),
}

/// A [`LightController`] scheduled as a [`Device`]
pub struct ZoneDevice<C> {
    controller: C,
    class: DeviceClass,
    name: String,
}

impl<C: LightController> ZoneDevice<C> {
    pub fn new(controller: C, class: DeviceClass) -> Self {
        let name = match class {
            DeviceClass::Keyboard => "Aura Keyboard".to_string(),
            DeviceClass::Mouse(_) => "Aura Mouse".to_string(),
            DeviceClass::Gpu => "Aura GPU".to_string(),
            DeviceClass::Generic => controller.name().to_string(),
        };
        Self {
            controller,
            class,
            name,
        }
    }

    /// Work out every write a frame needs before touching the controller
    fn stage(&self, frame: &ColorFrame) -> Vec<(Target, Rgb)> {
        let lights = self.controller.light_count();
        match self.class {
            DeviceClass::Keyboard => frame
                .iter()
                .filter_map(|(key, color)| Some((Target::Key(keycodes::key_code(key)?), color)))
                .collect(),
            // three lights can only be a logo, scroll wheel and front light
            DeviceClass::Mouse(_) if lights == PUGIO_ZONES.len() => PUGIO_ZONES
                .iter()
                .enumerate()
                .filter_map(|(i, &key)| Some((Target::Light(i), frame.get(key)?)))
                .collect(),
            _ => match frame.get(LogicalKey::PeripheralLogo) {
                Some(color) => (0..lights).map(|i| (Target::Light(i), color)).collect(),
                None => Vec::new(),
            },
        }
    }
}

impl<C: LightController> Device for ZoneDevice<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn class(&self) -> DeviceClass {
        self.class
    }

    fn led_count(&self) -> usize {
        self.controller.light_count()
    }

    fn updates_per_second(&self) -> f32 {
        match self.class {
            DeviceClass::Mouse(MouseKind::Pugio) => 15.0,
            _ => 30.0,
        }
    }

    fn apply_frame(&mut self, frame: &ColorFrame, cancel: &CancellationToken) -> Result<()> {
        let staged = self.stage(frame);
        if cancel.is_cancelled() {
            return Err(DeviceError::Cancelled);
        }
        self.controller.set_mode(MANUAL_MODE)?;
        for (target, color) in staged {
            match target {
                Target::Key(code) => {
                    self.controller.set_key(code, color)?;
                },
                Target::Light(index) => self.controller.set_light(index, color)?,
            }
        }
        self.controller.apply()
    }
}
