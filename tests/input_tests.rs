//! Integration tests for the input container: filtering, bulk configuration
//! and rendering.

mod common;

use common::{q, transfer_line};
use zgoubidoo::commands::{CommandClass, Drift, End, Marker};
use zgoubidoo::{Command, Input, InputValidator, Selector, UnitRegistry, WriteMode, ZgoubiError};

#[cfg(test)]
mod filter_tests {
    use super::*;

    #[test]
    fn filter_keeps_line_order() {
        let zi = transfer_line();
        let drifts = zi.filter(&[CommandClass::Drift.into()]);
        assert_eq!(drifts.labels1(), vec!["D1", "D2"]);
        assert_eq!(drifts.name(), "transfer_line_filtered_by_Drift");
    }

    #[test]
    fn abstract_classes_match_their_family() {
        let zi = transfer_line();
        let magnets = zi.filter(&[CommandClass::Magnet.into()]);
        assert_eq!(magnets.keywords(), vec!["QUADRUPO", "BEND"]);
        assert_eq!(zi.contains(&[CommandClass::Objet.into()]), 1);
        assert_eq!(zi.contains(&[CommandClass::Command.into()]), zi.len());
    }

    #[test]
    fn several_selectors_match_any() {
        let zi = transfer_line();
        let selectors = [Selector::from("Marker"), Selector::from("Quadrupole")];
        let view = zi.filter(&selectors);
        assert_eq!(view.labels1(), vec!["Q1", "M1"]);
        assert_eq!(zi.contains(&selectors), view.len());
    }

    #[test]
    fn unknown_class_name_matches_nothing() {
        let zi = transfer_line();
        assert_eq!(zi.contains(&[Selector::from("Sextupole")]), 0);
        let view = zi.filter(&[Selector::from("Drift"), Selector::from("Sextupole")]);
        assert!(view.is_empty());
    }

    #[test]
    fn filtered_names_are_deterministic() {
        let zi = transfer_line();
        let selectors = [Selector::from("Drift"), CommandClass::Bend.into()];
        assert_eq!(zi.filter(&selectors).name(), zi.filter(&selectors).name());
        assert_eq!(
            zi.filter(&selectors).name(),
            "transfer_line_filtered_by_Drift_Bend"
        );
    }

    #[test]
    fn filtered_views_share_records() {
        let zi = transfer_line();
        let mut drifts = zi.filter(&[CommandClass::Drift.into()]);
        assert_eq!(drifts.set("XL", q(3.0, "m")).unwrap(), 2);
        let first = zi.get(2).unwrap().borrow();
        assert_eq!(first.length(), Some(&q(3.0, "m")));
    }
}

#[cfg(test)]
mod configuration_tests {
    use super::*;

    #[test]
    fn bulk_set_only_touches_commands_holding_the_field() {
        let mut zi = transfer_line();
        // Two drifts, the quadrupole and the bend declare XL.
        assert_eq!(zi.set("XL", q(20.0, "cm")).unwrap(), 4);
        for record in zi.line() {
            let command = record.borrow();
            if let Some(length) = command.length() {
                assert_eq!(length, &q(20.0, "cm"));
            }
        }
    }

    #[test]
    fn bulk_set_skips_unset_fields() {
        let mut zi = transfer_line();
        // Only commands that already carry a first label are relabelled.
        assert_eq!(zi.set("LABEL1", "X").unwrap(), 6);
        // The objet has no explicit IMAX yet.
        assert_eq!(zi.set("IMAX", 10_i64).unwrap(), 0);
        assert_eq!(zi.set("NOT_A_FIELD", 1.0).unwrap(), 0);
    }

    #[test]
    fn bulk_set_reports_type_mismatches() {
        let mut zi = transfer_line();
        let err = zi.set("XL", true).unwrap_err();
        match err {
            ZgoubiError::Field {
                field, expected, ..
            } => {
                assert_eq!(field, "XL");
                assert_eq!(expected, "Quantity");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn quantities_can_be_set_from_text() {
        let mut zi = transfer_line();
        zi.set("XL", "75 cm").unwrap();
        assert_eq!(zi.get(2).unwrap().borrow().length(), Some(&q(75.0, "cm")));
    }

    #[test]
    fn apply_maps_every_command_in_order() {
        let mut zi = transfer_line();
        let before = zi.keywords();
        zi.apply(|command| command.with_label2("V2"));
        assert_eq!(zi.keywords(), before);
        assert!(zi.labels2().iter().all(|label| label == "V2"));
    }

    #[test]
    fn commands_can_be_appended() {
        let mut zi = Input::new("grow");
        zi += Marker::default().into();
        zi.extend([Command::new(Drift::new(q(1.0, "m"))), Command::new(End::default())]);
        assert_eq!(zi.keywords(), vec!["MARKER", "DRIFT", "END"]);
    }

    #[test]
    fn out_of_range_index_is_an_input_error() {
        let zi = transfer_line();
        assert!(zi.get(6).is_ok());
        assert!(zi.get(7).unwrap_err().is_input());
    }
}

#[cfg(test)]
mod rendering_tests {
    use super::*;

    #[test]
    fn render_starts_with_name_and_ends_with_end() {
        let units = UnitRegistry::default();
        let mut zi = transfer_line();
        let rendered = zi.render(&units).unwrap();
        assert!(rendered.starts_with("transfer_line\n 'OBJET' BUNCH\n"));
        assert!(rendered.contains("\n 'PARTICUL'\n"));
        assert!(rendered.contains("\n 'DRIFT' D1\n100\n"));
        assert!(rendered.ends_with("\n 'END'\n"));
        assert_eq!(zi.keywords().last(), Some(&"END"));

        let again = zi.render(&units).unwrap();
        assert_eq!(rendered, again);
    }

    #[test]
    fn write_truncates_then_appends() {
        let units = UnitRegistry::default();
        let dir = tempfile::tempdir().unwrap();
        let mut zi = transfer_line();

        let bytes = zi
            .write("zgoubi.dat", dir.path(), WriteMode::Truncate, Some(InputValidator::ALL), &units)
            .unwrap();
        let target = dir.path().join("zgoubi.dat");
        assert_eq!(std::fs::metadata(&target).unwrap().len() as usize, bytes);

        zi.write("zgoubi.dat", dir.path(), WriteMode::Truncate, None, &units)
            .unwrap();
        assert_eq!(std::fs::metadata(&target).unwrap().len() as usize, bytes);

        zi.write("zgoubi.dat", dir.path(), WriteMode::Append, None, &units)
            .unwrap();
        assert_eq!(std::fs::metadata(&target).unwrap().len() as usize, 2 * bytes);
    }

    #[test]
    fn failing_validation_prevents_writing() {
        let units = UnitRegistry::default();
        let dir = tempfile::tempdir().unwrap();
        let mut zi = Input::from_commands("no_objet", [Command::new(Marker::default())]);
        let err = zi
            .write("zgoubi.dat", dir.path(), WriteMode::Truncate, Some(InputValidator::ALL), &units)
            .unwrap_err();
        assert!(err.is_input());
        assert!(!dir.path().join("zgoubi.dat").exists());
    }
}
