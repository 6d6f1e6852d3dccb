//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use kindred_types::{Gender, NewPerson, PersonId, PersonUpdate, RelationSlot};

/// Keep a family tree of people and their relationships.
#[derive(Debug, Parser)]
#[command(name = "kindred", version, about)]
pub struct Cli {
    /// Path to the YAML config file [default: kindred.yaml if present].
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Family tree data file. Overrides the config file and environment.
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a person.
    Add(AddArgs),

    /// Edit a person's details. Omitted options keep their current value.
    Edit(EditArgs),

    /// Delete a person and every reference to them.
    Delete {
        /// Person identifier.
        id: PersonId,
    },

    /// Show one person's card.
    Show {
        /// Person identifier.
        id: PersonId,
    },

    /// List everyone, sorted by surname then first names.
    List,

    /// Set father, mother, or partner; or add a sibling or child.
    Link {
        /// Person identifier.
        id: PersonId,
        /// One of father, mother, partner, siblings, children.
        slot: RelationSlot,
        /// The related person's identifier.
        target: PersonId,
    },

    /// Clear father, mother, or partner; or remove a sibling or child.
    Unlink {
        /// Person identifier.
        id: PersonId,
        /// One of father, mother, partner, siblings, children.
        slot: RelationSlot,
        /// The related person's identifier. Required for siblings and children.
        target: Option<PersonId>,
    },

    /// List the people who may be chosen for a relationship slot.
    Candidates {
        /// Person identifier.
        id: PersonId,
        /// One of father, mother, partner, siblings, children.
        slot: RelationSlot,
    },

    /// Write the whole tree to `family_tree_<date>.json`.
    Export {
        /// Directory to write into [default: storage.export_dir].
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace the whole tree with the contents of an exported file.
    Import {
        /// File to read.
        file: PathBuf,
    },
}

/// Options for `add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Family name.
    #[arg(long, default_value = "")]
    pub surname: String,

    /// Given names.
    #[arg(long, default_value = "")]
    pub first_names: String,

    /// Date of birth (YYYY, YYYY-MM, or YYYY-MM-DD).
    #[arg(long, default_value = "")]
    pub born: String,

    /// Date of death.
    #[arg(long, default_value = "")]
    pub died: String,

    /// Marriage date.
    #[arg(long, default_value = "")]
    pub married: String,

    /// male, female, or unspecified.
    #[arg(long)]
    pub gender: Option<Gender>,
}

impl From<AddArgs> for NewPerson {
    fn from(args: AddArgs) -> Self {
        Self {
            surname: args.surname,
            first_names: args.first_names,
            date_of_birth: args.born,
            date_of_death: args.died,
            marriage_date: args.married,
            gender: args.gender.unwrap_or_default(),
        }
    }
}

/// Options for `edit`.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Person identifier.
    pub id: PersonId,

    /// Family name.
    #[arg(long)]
    pub surname: Option<String>,

    /// Given names.
    #[arg(long)]
    pub first_names: Option<String>,

    /// Date of birth. Pass an empty string to clear.
    #[arg(long)]
    pub born: Option<String>,

    /// Date of death. Pass an empty string to clear.
    #[arg(long)]
    pub died: Option<String>,

    /// Marriage date. Pass an empty string to clear.
    #[arg(long)]
    pub married: Option<String>,

    /// male, female, or unspecified.
    #[arg(long)]
    pub gender: Option<Gender>,
}

impl EditArgs {
    /// Split into the target identifier and the attribute edit.
    pub fn into_update(self) -> (PersonId, PersonUpdate) {
        (
            self.id,
            PersonUpdate {
                surname: self.surname,
                first_names: self.first_names,
                date_of_birth: self.born,
                date_of_death: self.died,
                marriage_date: self.married,
                gender: self.gender,
            },
        )
    }
}
