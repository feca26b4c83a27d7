//! Structural validation of Zgoubi inputs.
//!
//! Validators are stateless: each inspects an [`Input`] and either returns
//! `Ok(true)` or fails with a structured input error. They follow the rules
//! of the Zgoubi manual.

use crate::commands::{CommandClass, Selector};
use crate::error::{Result, ZgoubiError};
use crate::input::{Input, Validator, ZGOUBI_IMAX};

pub struct InputValidator;

impl InputValidator {
    /// Every validator, in the order they are usually applied.
    pub const ALL: &'static [Validator] = &[
        InputValidator::objet_is_first_command,
        InputValidator::objets_do_not_exceed_imax,
    ];

    /// Checks that the first command, if any, is an objet or an MC objet.
    pub fn objet_is_first_command(input: &Input) -> Result<bool> {
        let Some(first) = input.line().first() else {
            return Ok(true);
        };
        let first = first.borrow();
        if first.is_instance_of(CommandClass::Objet) || first.is_instance_of(CommandClass::MCObjet) {
            return Ok(true);
        }
        Err(ZgoubiError::input_with_help(
            format!(
                "The first command in the input is not an Objet (or MCObjet), found '{}'.",
                first.keyword()
            ),
            "start the input with an 'OBJET' or 'MCOBJET' command",
        ))
    }

    /// Checks that no objet declares more particles than Zgoubi's IMAX ceiling.
    pub fn objets_do_not_exceed_imax(input: &Input) -> Result<bool> {
        let objets = input.filter(&[
            Selector::from(CommandClass::Objet),
            Selector::from(CommandClass::MCObjet),
        ]);
        for record in objets.line() {
            let objet = record.borrow();
            if objet.imax().unwrap_or(0) > ZGOUBI_IMAX {
                let label = objet.label1.as_deref().unwrap_or(objet.keyword());
                return Err(ZgoubiError::input(format!(
                    "Objet {} IMAX exceeds maximum value ({}).",
                    label, ZGOUBI_IMAX
                )));
            }
        }
        Ok(true)
    }
}
