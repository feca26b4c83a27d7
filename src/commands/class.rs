use std::fmt;

/// Discriminators used to filter an input by command kind.
///
/// Abstract classes (`Command`, `Objet`, `MCObjet`, `Magnet`) match every
/// concrete class belonging to their family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandClass {
    Command,
    Objet,
    MCObjet,
    Magnet,
    Objet2,
    MCObjet3,
    Particule,
    Drift,
    Marker,
    Quadrupole,
    Bend,
    Faisceau,
    End,
}

impl CommandClass {
    pub const ALL: &'static [CommandClass] = &[
        CommandClass::Command,
        CommandClass::Objet,
        CommandClass::MCObjet,
        CommandClass::Magnet,
        CommandClass::Objet2,
        CommandClass::MCObjet3,
        CommandClass::Particule,
        CommandClass::Drift,
        CommandClass::Marker,
        CommandClass::Quadrupole,
        CommandClass::Bend,
        CommandClass::Faisceau,
        CommandClass::End,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CommandClass::Command => "Command",
            CommandClass::Objet => "Objet",
            CommandClass::MCObjet => "MCObjet",
            CommandClass::Magnet => "Magnet",
            CommandClass::Objet2 => "Objet2",
            CommandClass::MCObjet3 => "MCObjet3",
            CommandClass::Particule => "Particule",
            CommandClass::Drift => "Drift",
            CommandClass::Marker => "Marker",
            CommandClass::Quadrupole => "Quadrupole",
            CommandClass::Bend => "Bend",
            CommandClass::Faisceau => "Faisceau",
            CommandClass::End => "End",
        }
    }

    /// Case-sensitive lookup by class name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|class| class.name() == name)
    }

    /// True when a command of concrete class `concrete` is an instance of `self`.
    pub fn matches(&self, concrete: CommandClass) -> bool {
        use CommandClass::*;
        match self {
            Command => true,
            Objet => concrete == Objet2,
            MCObjet => concrete == MCObjet3,
            Magnet => matches!(concrete, Quadrupole | Bend),
            other => *other == concrete,
        }
    }
}

impl fmt::Display for CommandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A filter argument: either a class or its textual name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Class(CommandClass),
    Name(String),
}

impl Selector {
    /// `None` for a name that does not denote a known class.
    pub fn resolve(&self) -> Option<CommandClass> {
        match self {
            Selector::Class(class) => Some(*class),
            Selector::Name(name) => CommandClass::from_name(name),
        }
    }

    /// The text used when naming filtered inputs.
    pub fn label(&self) -> &str {
        match self {
            Selector::Class(class) => class.name(),
            Selector::Name(name) => name,
        }
    }
}

impl From<CommandClass> for Selector {
    fn from(class: CommandClass) -> Self {
        Selector::Class(class)
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Name(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Name(name)
    }
}
