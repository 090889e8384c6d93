//! Simulation settings
//!
//! The values a user enters before a run. Persisted in LocalStorage on the
//! web and written back into the form on load, so the form comes back the
//! way it was left; the simulation state itself is never saved.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::EpidemicModel;

/// User-facing run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of bodies at start
    pub population: u32,
    /// Smallest body radius (px)
    pub min_radius: f32,
    /// Largest body radius (px)
    pub max_radius: f32,
    /// Initial velocity components are drawn from [-speed, speed] (px/s)
    pub speed: f32,
    /// Seconds from infection to recovery
    pub infectious_duration: f32,
    /// Probability that an infection ends in death (0..=1)
    pub case_fatality: f32,
    /// SIR or SIRS
    pub model: EpidemicModel,
    /// Fixed RNG seed; `None` draws one from entropy
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            population: 200,
            min_radius: 4.0,
            max_radius: 8.0,
            speed: 60.0,
            infectious_duration: 10.0,
            case_fatality: 0.1,
            model: EpidemicModel::Sir,
            seed: None,
        }
    }
}

impl Settings {
    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(Error::InvalidParam("population must be > 0".into()));
        }
        if !self.min_radius.is_finite() || self.min_radius <= 0.0 {
            return Err(Error::InvalidParam(
                "min_radius must be finite and > 0".into(),
            ));
        }
        if !self.max_radius.is_finite() || self.max_radius < self.min_radius {
            return Err(Error::InvalidParam(
                "max_radius must be finite and >= min_radius".into(),
            ));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(Error::InvalidParam("speed must be finite and >= 0".into()));
        }
        if !self.infectious_duration.is_finite() || self.infectious_duration <= 0.0 {
            return Err(Error::InvalidParam(
                "infectious_duration must be finite and > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.case_fatality) {
            return Err(Error::InvalidParam(
                "case_fatality must be within [0, 1]".into(),
            ));
        }
        if let EpidemicModel::Sirs { immunity_duration } = self.model {
            if !immunity_duration.is_finite() || immunity_duration <= 0.0 {
                return Err(Error::InvalidParam(
                    "immunity_duration must be finite and > 0".into(),
                ));
            }
        }
        Ok(())
    }

    /// Parse settings from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "epidemic_billiards_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::stored().unwrap_or_else(|| {
            log::info!("Using default settings");
            Self::default()
        })
    }

    /// Settings saved by an earlier run, if any are stored and valid
    #[cfg(target_arch = "wasm32")]
    pub fn stored() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok().flatten()?;
        let json = storage.get_item(Self::STORAGE_KEY).ok().flatten()?;
        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from LocalStorage");
                Some(settings)
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                None
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Ids of the page's input fields, in form order
    pub const FORM_FIELDS: [&'static str; 7] = [
        "nParticles",
        "minRadius",
        "maxRadius",
        "speed",
        "recoverTime",
        "caseFatality",
        "immunityDuration",
    ];

    /// Value shown in the form field `id`, if it is one of ours.
    ///
    /// An immunity duration of 0 stands for SIR.
    pub fn form_value(&self, id: &str) -> Option<String> {
        let v = match id {
            "nParticles" => self.population.to_string(),
            "minRadius" => self.min_radius.to_string(),
            "maxRadius" => self.max_radius.to_string(),
            "speed" => self.speed.to_string(),
            "recoverTime" => self.infectious_duration.to_string(),
            "caseFatality" => self.case_fatality.to_string(),
            "immunityDuration" => match self.model {
                EpidemicModel::Sir => "0".to_string(),
                EpidemicModel::Sirs { immunity_duration } => immunity_duration.to_string(),
            },
            _ => return None,
        };
        Some(v)
    }

    /// Take the number entered in form field `id`.
    ///
    /// Durations are in seconds and speed in px/s. A positive immunity
    /// duration switches to SIRS; zero or less means SIR. Unknown ids are
    /// ignored.
    pub fn apply_field(&mut self, id: &str, v: f64) {
        match id {
            "nParticles" => self.population = v.max(0.0) as u32,
            "minRadius" => self.min_radius = v as f32,
            "maxRadius" => self.max_radius = v as f32,
            "speed" => self.speed = v as f32,
            "recoverTime" => self.infectious_duration = v as f32,
            "caseFatality" => self.case_fatality = v as f32,
            "immunityDuration" => {
                self.model = if v > 0.0 {
                    EpidemicModel::Sirs {
                        immunity_duration: v as f32,
                    }
                } else {
                    EpidemicModel::Sir
                }
            }
            _ => {}
        }
    }

    /// Overwrite fields with the values of the page's input form.
    ///
    /// Missing or unparsable inputs leave the current value alone.
    #[cfg(target_arch = "wasm32")]
    pub fn apply_form(&mut self, document: &web_sys::Document) {
        for id in Self::FORM_FIELDS {
            let Some(input) = form_input(document, id) else {
                continue;
            };
            if let Ok(v) = input.value().trim().parse::<f64>() {
                self.apply_field(id, v);
            }
        }
    }

    /// Write these settings into the page's input form, so a reload shows
    /// the values of the last run.
    #[cfg(target_arch = "wasm32")]
    pub fn fill_form(&self, document: &web_sys::Document) {
        for id in Self::FORM_FIELDS {
            if let (Some(input), Some(value)) = (form_input(document, id), self.form_value(id)) {
                input.set_value(&value);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(target_arch = "wasm32")]
fn form_input(document: &web_sys::Document, id: &str) -> Option<web_sys::HtmlInputElement> {
    use wasm_bindgen::JsCast;

    document.get_element_by_id(id)?.dyn_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let cases = [
            Settings {
                population: 0,
                ..Default::default()
            },
            Settings {
                min_radius: 0.0,
                ..Default::default()
            },
            Settings {
                min_radius: 9.0,
                max_radius: 3.0,
                ..Default::default()
            },
            Settings {
                speed: -1.0,
                ..Default::default()
            },
            Settings {
                infectious_duration: 0.0,
                ..Default::default()
            },
            Settings {
                case_fatality: 1.5,
                ..Default::default()
            },
            Settings {
                model: EpidemicModel::Sirs {
                    immunity_duration: -2.0,
                },
                ..Default::default()
            },
        ];
        for s in &cases {
            assert!(s.validate().is_err(), "accepted {s:?}");
        }
    }

    #[test]
    fn test_certain_death_is_allowed() {
        let s = Settings {
            case_fatality: 1.0,
            ..Default::default()
        };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_with_partial_input() {
        let json = r#"{ "population": 50, "model": { "Sirs": { "immunity_duration": 20.0 } } }"#;
        let s = Settings::from_json(json).unwrap();
        assert_eq!(s.population, 50);
        assert_eq!(s.max_radius, Settings::default().max_radius);
        assert_eq!(
            s.model,
            EpidemicModel::Sirs {
                immunity_duration: 20.0
            }
        );

        let json = s.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }

    #[test]
    fn test_from_json_validates() {
        assert!(Settings::from_json(r#"{ "population": 0 }"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_form_values_read_back_to_same_settings() {
        let cases = [
            Settings {
                population: 321,
                min_radius: 2.5,
                max_radius: 7.0,
                speed: 90.0,
                infectious_duration: 12.0,
                case_fatality: 0.25,
                model: EpidemicModel::Sirs {
                    immunity_duration: 30.0,
                },
                seed: None,
            },
            Settings {
                model: EpidemicModel::Sir,
                ..Default::default()
            },
        ];
        for stored in &cases {
            // Start from the other case so every field has to change
            let mut read = if stored.model == EpidemicModel::Sir {
                cases[0].clone()
            } else {
                cases[1].clone()
            };
            for id in Settings::FORM_FIELDS {
                let value = stored.form_value(id).unwrap();
                read.apply_field(id, value.parse().unwrap());
            }
            assert_eq!(&read, stored);
        }
    }

    #[test]
    fn test_unknown_form_field_is_ignored() {
        let mut s = Settings::default();
        s.apply_field("colour", 3.0);
        assert_eq!(s, Settings::default());
        assert!(s.form_value("colour").is_none());
    }
}
