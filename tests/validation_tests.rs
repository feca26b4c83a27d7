//! Integration tests for the structural validators.

mod common;

use common::q;
use zgoubidoo::commands::{Drift, MCObjet3, Marker, Objet2, Particule};
use zgoubidoo::{Command, Input, InputValidator, ZgoubiError, ZGOUBI_IMAX};

fn with_first(command: Command) -> Input {
    Input::from_commands("checked", [command, Command::new(Marker::default())])
}

#[test]
fn empty_input_is_valid() {
    let zi = Input::new("empty");
    assert!(InputValidator::objet_is_first_command(&zi).unwrap());
    assert!(InputValidator::objets_do_not_exceed_imax(&zi).unwrap());
    assert!(zi.validate(InputValidator::ALL).unwrap());
}

#[test]
fn objet_or_mcobjet_may_come_first() {
    let objet = with_first(Command::new(Objet2::new(q(1.0, "T*m"))));
    let mc = with_first(Command::new(MCObjet3::new(q(1.0, "T*m")).with_imax(100)));
    assert!(objet.validate(InputValidator::ALL).unwrap());
    assert!(mc.validate(InputValidator::ALL).unwrap());
}

#[test]
fn other_first_command_is_rejected() {
    let zi = with_first(Command::new(Drift::new(q(1.0, "m"))));
    let err = InputValidator::objet_is_first_command(&zi).unwrap_err();
    assert!(err.is_input());
    assert!(err.to_string().contains("not an Objet (or MCObjet)"));
    assert!(err.to_string().contains("DRIFT"));

    let zi = with_first(Command::new(Particule::proton()));
    assert!(zi.validate(InputValidator::ALL).is_err());
}

#[test]
fn imax_ceiling_is_inclusive() {
    let at_limit = with_first(Command::new(
        Objet2::new(q(1.0, "T*m")).with_imax(ZGOUBI_IMAX),
    ));
    assert!(InputValidator::objets_do_not_exceed_imax(&at_limit).unwrap());

    let over = with_first(
        Command::new(Objet2::new(q(1.0, "T*m")).with_imax(ZGOUBI_IMAX + 1)).with_label1("BUNCH"),
    );
    let err = InputValidator::objets_do_not_exceed_imax(&over).unwrap_err();
    assert!(matches!(err, ZgoubiError::Input { .. }));
    assert_eq!(
        err.to_string(),
        "Objet BUNCH IMAX exceeds maximum value (10000)."
    );
}

#[test]
fn mcobjet_imax_is_checked_too() {
    let over = with_first(Command::new(MCObjet3::new(q(1.0, "T*m")).with_imax(20_000)));
    let err = over.validate(InputValidator::ALL).unwrap_err();
    assert!(err.to_string().contains("MCOBJET IMAX exceeds"));
}

#[test]
fn first_failure_stops_validation() {
    // Both rules fail; the first-command rule runs first.
    let zi = Input::from_commands(
        "broken",
        [
            Command::new(Marker::default()),
            Command::new(Objet2::new(q(1.0, "T*m")).with_imax(ZGOUBI_IMAX + 1)),
        ],
    );
    let err = zi.validate(InputValidator::ALL).unwrap_err();
    assert!(err.to_string().contains("first command"));
}
