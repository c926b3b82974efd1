//! Column shapes repeated across the hrd_* tables.

use sea_orm_migration::prelude::*;

pub fn id<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

pub fn text<T: IntoIden>(name: T, len: u32) -> ColumnDef {
    ColumnDef::new(name).string_len(len).not_null().to_owned()
}

pub fn text_or_empty<T: IntoIden>(name: T, len: u32) -> ColumnDef {
    ColumnDef::new(name)
        .string_len(len)
        .not_null()
        .default("")
        .to_owned()
}

pub fn flag<T: IntoIden>(name: T, default: bool) -> ColumnDef {
    ColumnDef::new(name)
        .boolean()
        .not_null()
        .default(default)
        .to_owned()
}

/// Enumerations are stored as short strings; membership is checked before insert.
pub fn enumeration<T: IntoIden>(name: T, default: Option<&str>) -> ColumnDef {
    let mut column = ColumnDef::new(name);
    column.string_len(32).not_null();
    if let Some(value) = default {
        column.default(value);
    }
    column
}

pub fn money<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).decimal_len(12, 2).not_null().to_owned()
}

pub fn money_opt<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).decimal_len(12, 2).null().to_owned()
}

pub fn json_object<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).json().not_null().default("{}").to_owned()
}

pub fn json_list<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).json().not_null().default("[]").to_owned()
}

pub fn created_now<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

pub fn reference<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).integer().not_null().to_owned()
}

pub fn reference_opt<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).integer().null().to_owned()
}
