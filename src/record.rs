//! Listing stubs, detail fields and the merged rows written to disk.

use crate::normalize::Numeric;
use crate::output::{float_cell, opt_cell, TsvRecord};

/// Form recorded for every creature; alternate forms are not split out.
pub const DEFAULT_FORM: &str = "normal";

/// A detail value that distinguishes "label not on the page" from
/// "label present, value marked as not applicable".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    /// Detail value when the page had the label, else the listing value.
    pub fn or_stub(self, stub: Option<T>) -> Option<T> {
        match self {
            Field::Absent => stub,
            Field::Null => None,
            Field::Value(value) => Some(value),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Value(value),
            None => Field::Null,
        }
    }
}

/// Shared view of a listing row, used to drive the detail phase.
pub trait Stub {
    fn link(&self) -> &str;

    /// Short human label for logs.
    fn label(&self) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PokemonStub {
    pub id: String,
    pub name_en: String,
    pub link: String,
    pub type1: Option<String>,
    pub type2: Option<String>,
    pub generation: u32,
}

impl Stub for PokemonStub {
    fn link(&self) -> &str {
        &self.link
    }

    fn label(&self) -> String {
        format!("{} {}", self.id, self.name_en)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveStub {
    pub name_en: String,
    pub link: String,
    pub move_type: Option<String>,
    pub category: Option<String>,
    pub power: Option<i64>,
    pub accuracy: Option<Numeric>,
    pub pp: Option<i64>,
    pub effects: String,
    pub generation: u32,
}

impl Stub for MoveStub {
    fn link(&self) -> &str {
        &self.link
    }

    fn label(&self) -> String {
        self.name_en.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseStats {
    pub hp: Option<i64>,
    pub attack: Option<i64>,
    pub defense: Option<i64>,
    pub sp_attack: Option<i64>,
    pub sp_defense: Option<i64>,
    pub speed: Option<i64>,
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PokemonDetail {
    pub name_kr: Option<String>,
    pub species: Option<String>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub base_exp: Option<i64>,
    pub catch_rate: Option<i64>,
    pub form: Option<String>,
    pub evo_from_id: Option<String>,
    pub evo_from_cond: Option<String>,
    pub stats: BaseStats,
    pub descriptions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveDetail {
    pub name_kr: Option<String>,
    pub move_type: Field<String>,
    pub category: Field<String>,
    pub power: Field<i64>,
    pub accuracy: Field<Numeric>,
    pub pp: Field<i64>,
    pub target: Option<String>,
    pub description: Option<String>,
    pub learnable: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PokemonRecord {
    pub id: String,
    pub generation: u32,
    pub name_en: String,
    pub name_kr: Option<String>,
    pub type1: Option<String>,
    pub type2: Option<String>,
    pub species: Option<String>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub base_exp: Option<i64>,
    pub catch_rate: Option<i64>,
    pub form: String,
    pub evo_from_id: Option<String>,
    pub evo_from_cond: Option<String>,
    pub stats: BaseStats,
    pub descriptions: Option<String>,
    pub link: String,
}

impl PokemonRecord {
    pub fn merge(stub: PokemonStub, detail: PokemonDetail) -> Self {
        Self {
            id: stub.id,
            generation: stub.generation,
            name_en: stub.name_en,
            name_kr: detail.name_kr,
            type1: stub.type1,
            type2: stub.type2,
            species: detail.species,
            height_m: detail.height_m,
            weight_kg: detail.weight_kg,
            base_exp: detail.base_exp,
            catch_rate: detail.catch_rate,
            form: detail.form.unwrap_or_else(|| DEFAULT_FORM.to_string()),
            evo_from_id: detail.evo_from_id,
            evo_from_cond: detail.evo_from_cond,
            stats: detail.stats,
            descriptions: detail.descriptions,
            link: stub.link,
        }
    }
}

impl TsvRecord for PokemonRecord {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "generation",
        "name_en",
        "name_kr",
        "type1",
        "type2",
        "species",
        "height_m",
        "weight_kg",
        "base_exp",
        "catch_rate",
        "form",
        "evo_from_id",
        "evo_from_cond",
        "HP",
        "Atk",
        "Def",
        "SpAtk",
        "SpDef",
        "Spd",
        "Tot",
        "descriptions",
        "link",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.generation.to_string(),
            self.name_en.clone(),
            opt_cell(self.name_kr.as_ref()),
            opt_cell(self.type1.as_ref()),
            opt_cell(self.type2.as_ref()),
            opt_cell(self.species.as_ref()),
            float_cell(self.height_m),
            float_cell(self.weight_kg),
            opt_cell(self.base_exp),
            opt_cell(self.catch_rate),
            self.form.clone(),
            opt_cell(self.evo_from_id.as_ref()),
            opt_cell(self.evo_from_cond.as_ref()),
            opt_cell(self.stats.hp),
            opt_cell(self.stats.attack),
            opt_cell(self.stats.defense),
            opt_cell(self.stats.sp_attack),
            opt_cell(self.stats.sp_defense),
            opt_cell(self.stats.speed),
            opt_cell(self.stats.total),
            opt_cell(self.descriptions.as_ref()),
            self.link.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveRecord {
    pub id: Option<String>,
    pub name_en: String,
    pub name_kr: Option<String>,
    pub move_type: Option<String>,
    pub category: Option<String>,
    pub power: Option<i64>,
    pub accuracy: Option<Numeric>,
    pub pp: Option<i64>,
    pub effects: String,
    pub description: Option<String>,
    pub target: Option<String>,
    pub learnable: Option<String>,
    pub generation: u32,
    pub link: String,
}

impl MoveRecord {
    pub fn merge(id: Option<String>, stub: MoveStub, detail: MoveDetail) -> Self {
        Self {
            id,
            name_en: stub.name_en,
            name_kr: detail.name_kr,
            move_type: detail.move_type.or_stub(stub.move_type),
            category: detail.category.or_stub(stub.category),
            power: detail.power.or_stub(stub.power),
            accuracy: detail.accuracy.or_stub(stub.accuracy),
            pp: detail.pp.or_stub(stub.pp),
            effects: stub.effects,
            description: detail.description,
            target: detail.target,
            learnable: detail.learnable,
            generation: stub.generation,
            link: stub.link,
        }
    }
}

impl TsvRecord for MoveRecord {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name_en",
        "name_kr",
        "type",
        "category",
        "power",
        "accuracy",
        "pp",
        "effects",
        "description",
        "target",
        "learnable",
        "generation",
        "link",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            opt_cell(self.id.as_ref()),
            self.name_en.clone(),
            opt_cell(self.name_kr.as_ref()),
            opt_cell(self.move_type.as_ref()),
            opt_cell(self.category.as_ref()),
            opt_cell(self.power),
            opt_cell(self.accuracy),
            opt_cell(self.pp),
            self.effects.clone(),
            opt_cell(self.description.as_ref()),
            opt_cell(self.target.as_ref()),
            opt_cell(self.learnable.as_ref()),
            self.generation.to_string(),
            self.link.clone(),
        ]
    }
}
