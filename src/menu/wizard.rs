//! Settings wizard.
//!
//! Stages run Power, Density, then Mohs (standard density) or Weight
//! (light density), Units and Aggregate size. High power has no density
//! choice and skips straight to Units. Each Enter commits the highlighted
//! value before the next stage is chosen, since the branch depends on it.

use tracing::{debug, info};

use super::{Context, Event, Screen, Selector, Step};
use crate::data::{
    AggregateSize, Density, HardnessClass, PowerLevel, Settings, Units, WeightClass,
};
use crate::display::{
    aggregate_label, density_label, hardness_label, power_label, units_label, weight_label, Frame,
};
use crate::hal::{Key, NonvolatileStore};

/// A wizard stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStage {
    /// Power level.
    Power,
    /// Concrete density.
    Density,
    /// Light-density weight class.
    Weight,
    /// Standard-density Mohs hardness.
    Mohs,
    /// Display units.
    Units,
    /// Aggregate size.
    Aggregate,
}

impl WizardStage {
    /// Title shown on line 1.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Power => "Set Power",
            Self::Density => "Set Density",
            Self::Weight => "Set Weight",
            Self::Mohs => "Set Mohs",
            Self::Units => "Set Units",
            Self::Aggregate => "Set Aggr Size",
        }
    }
}

/// Wizard progress over a working copy of the settings.
///
/// Nothing is persisted until the last stage is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsWizard {
    stage: WizardStage,
    selector: Selector,
    draft: Settings,
}

impl SettingsWizard {
    /// Start at the power stage from the current settings.
    pub fn new(settings: Settings) -> Self {
        Self::at(WizardStage::Power, settings)
    }

    fn at(stage: WizardStage, draft: Settings) -> Self {
        let selector = match stage {
            WizardStage::Power => Selector::new(
                draft.power.to_raw(),
                PowerLevel::MIN_RAW,
                PowerLevel::MAX_RAW,
            ),
            WizardStage::Density => {
                Selector::new(draft.density.to_raw(), Density::MIN_RAW, Density::MAX_RAW)
            }
            // Super-low is never offered
            WizardStage::Weight => Selector::new(
                draft.weight.to_raw(),
                WeightClass::MIN_RAW,
                WeightClass::Low.to_raw(),
            ),
            WizardStage::Mohs => Selector::new(
                draft.hardness.to_raw(),
                HardnessClass::MIN_RAW,
                HardnessClass::MAX_RAW,
            ),
            WizardStage::Units => {
                Selector::new(draft.units.to_raw(), Units::MIN_RAW, Units::MAX_RAW)
            }
            WizardStage::Aggregate => Selector::new(
                draft.aggregate.to_raw(),
                AggregateSize::MIN_RAW,
                AggregateSize::MAX_RAW,
            ),
        };
        Self {
            stage,
            selector,
            draft,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> WizardStage {
        self.stage
    }

    /// Working copy with every committed stage applied.
    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    /// Highlighted value.
    pub fn selector(&self) -> Selector {
        self.selector
    }

    /// Handle one event.
    pub fn handle<S: NonvolatileStore>(mut self, event: Event, ctx: &mut Context<'_, S>) -> Step {
        match event {
            Event::Key(Key::Enter) => self.commit(ctx),
            Event::Key(key) => {
                self.selector.apply(key);
                Step::to(Screen::SetSettings(self))
            }
            Event::Tick => Step::to(Screen::SetSettings(self)),
        }
    }

    fn commit<S: NonvolatileStore>(mut self, ctx: &mut Context<'_, S>) -> Step {
        let value = self.selector.value();
        let draft = &mut self.draft;

        let next = match self.stage {
            WizardStage::Power => {
                draft.power = PowerLevel::from_raw(value).unwrap_or_default();
                if draft.power == PowerLevel::High {
                    WizardStage::Units
                } else {
                    WizardStage::Density
                }
            }
            WizardStage::Density => {
                draft.density = Density::from_raw(value).unwrap_or_default();
                match draft.density {
                    Density::Standard => WizardStage::Mohs,
                    Density::Light => WizardStage::Weight,
                }
            }
            WizardStage::Weight => {
                draft.weight = WeightClass::from_raw(value).unwrap_or_default();
                draft.hardness = HardnessClass::Moh3;
                WizardStage::Units
            }
            WizardStage::Mohs => {
                draft.hardness = HardnessClass::from_raw(value).unwrap_or_default();
                draft.weight = WeightClass::High;
                WizardStage::Units
            }
            WizardStage::Units => {
                draft.units = Units::from_raw(value).unwrap_or_default();
                WizardStage::Aggregate
            }
            WizardStage::Aggregate => {
                draft.aggregate = AggregateSize::from_raw(value).unwrap_or_default();
                if draft.aggregate == AggregateSize::Medium {
                    draft.hardness = HardnessClass::Moh3;
                }
                ctx.store.save_settings(draft);
                info!("Settings wizard complete");
                return ctx.go_home();
            }
        };

        debug!("Wizard {:?} -> {:?}", self.stage, next);
        Step::to(Screen::SetSettings(Self::at(next, self.draft)))
    }

    fn value_label(&self) -> &'static str {
        let value = self.selector.value();
        let units = self.draft.units;
        let label = match self.stage {
            WizardStage::Power => PowerLevel::from_raw(value).map(power_label),
            WizardStage::Density => Density::from_raw(value).map(density_label),
            WizardStage::Weight => WeightClass::from_raw(value).map(|w| weight_label(w, units)),
            WizardStage::Mohs => HardnessClass::from_raw(value).map(hardness_label),
            WizardStage::Units => Units::from_raw(value).map(units_label),
            WizardStage::Aggregate => {
                AggregateSize::from_raw(value).map(|a| aggregate_label(a, units))
            }
        };
        label.unwrap_or_default()
    }

    /// Render the stage title and highlighted value.
    pub fn render(&self) -> Frame {
        Frame::text(self.stage.title(), self.value_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::bench::Bench;
    use crate::hal::Row;
    use pretty_assertions::assert_eq;

    fn wizard(step: &Step) -> SettingsWizard {
        match step.screen {
            Screen::SetSettings(wizard) => wizard,
            ref other => panic!("expected wizard, got {:?}", other),
        }
    }

    #[test]
    fn test_power_stage_render() {
        let bench = Bench::new();
        let wizard = SettingsWizard::new(bench.session.settings);
        let frame = wizard.render();
        assert_eq!(frame.line(Row::First).trimmed(), "Set Power");
        assert_eq!(frame.line(Row::Second).trimmed(), "Std Power");
    }

    #[test]
    fn test_standard_density_path() {
        let mut bench = Bench::new();
        let start = Screen::SetSettings(SettingsWizard::new(bench.session.settings));

        // Std power, Std density
        let step = bench.keys(start, &[Key::Enter, Key::Enter]);
        assert_eq!(wizard(&step).stage(), WizardStage::Mohs);
        assert_eq!(bench.render(&step.screen).line(Row::Second).trimmed(), "MOH#5");

        // Moh6, keep metric, Small aggregate
        let step = bench.keys(step.screen, &[Key::Up, Key::Enter]);
        assert_eq!(wizard(&step).stage(), WizardStage::Units);
        let step = bench.keys(step.screen, &[Key::Enter, Key::Up]);
        assert_eq!(wizard(&step).stage(), WizardStage::Aggregate);
        assert_eq!(bench.render(&step.screen).line(Row::Second).trimmed(), "25mm-S");

        let step = bench.keys(step.screen, &[Key::Enter]);
        assert!(step.screen.is_home());
        assert_eq!(bench.session.settings.hardness, HardnessClass::Moh6);
        assert_eq!(bench.session.settings.aggregate, AggregateSize::Small);
        assert_eq!(bench.session.settings.weight, WeightClass::High);
    }

    #[test]
    fn test_light_density_path() {
        let mut bench = Bench::new();
        let start = Screen::SetSettings(SettingsWizard::new(bench.session.settings));

        // Low power, Light density
        let step = bench.keys(start, &[Key::Up, Key::Enter, Key::Up, Key::Enter]);
        let w = wizard(&step);
        assert_eq!(w.stage(), WizardStage::Weight);
        assert_eq!(w.selector().max(), WeightClass::Low.to_raw());
        assert_eq!(bench.render(&step.screen).line(Row::Second).trimmed(), ">.83-h");

        // Medium weight resets mohs
        let step = bench.keys(step.screen, &[Key::Up, Key::Enter]);
        let w = wizard(&step);
        assert_eq!(w.stage(), WizardStage::Units);
        assert_eq!(w.draft().weight, WeightClass::Medium);
        assert_eq!(w.draft().hardness, HardnessClass::Moh3);

        // Switch to PSI, then the aggregate label follows the new units
        let step = bench.keys(step.screen, &[Key::Up, Key::Enter, Key::Down]);
        assert_eq!(bench.render(&step.screen).line(Row::Second).trimmed(), "2in.-L");
        bench.keys(step.screen, &[Key::Enter]);

        let (saved, _) = bench.store.load_settings();
        assert_eq!(saved.power, PowerLevel::Low);
        assert_eq!(saved.density, Density::Light);
        assert_eq!(saved.weight, WeightClass::Medium);
        assert_eq!(saved.units, Units::Imperial);
        assert_eq!(saved.aggregate, AggregateSize::Large);
    }

    #[test]
    fn test_high_power_skips_density() {
        let mut bench = Bench::new();
        let start = Screen::SetSettings(SettingsWizard::new(bench.session.settings));
        let step = bench.keys(start, &[Key::Down, Key::Enter]);
        let w = wizard(&step);
        assert_eq!(w.draft().power, PowerLevel::High);
        assert_eq!(w.stage(), WizardStage::Units);
    }

    #[test]
    fn test_medium_aggregate_resets_mohs() {
        let mut bench = Bench::new();
        let start = Screen::SetSettings(SettingsWizard::new(bench.session.settings));
        // Std, Std, Moh5 kept, metric, Medium aggregate
        bench.keys(
            start,
            &[Key::Enter, Key::Enter, Key::Enter, Key::Enter, Key::Enter],
        );
        assert_eq!(bench.session.settings.hardness, HardnessClass::Moh3);
    }

    #[test]
    fn test_escape_discards_draft() {
        let mut bench = Bench::new();
        let start = Screen::SetSettings(SettingsWizard::new(bench.session.settings));
        let step = bench.keys(start, &[Key::Down, Key::Enter, Key::Escape]);
        assert!(step.screen.is_home());
        assert_eq!(bench.session.settings.power, PowerLevel::Standard);
        assert_eq!(bench.store.load_settings().0.power, PowerLevel::Standard);
    }

    #[test]
    fn test_super_low_shown_until_moved() {
        let settings = Settings {
            density: Density::Light,
            weight: WeightClass::SuperLow,
            ..Settings::default()
        };
        let wizard = SettingsWizard::at(WizardStage::Weight, settings);
        assert_eq!(wizard.render().line(Row::Second).trimmed(), "SupLow");
    }
}
