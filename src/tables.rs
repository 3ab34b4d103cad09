use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use enumset::EnumSet;

use crate::{
    api::contact::Accounts,
    core::{
        pricing::PlanResult,
        profile::UsageProfile,
        rates::{RateKey, RateParameters},
    },
    db::meters::Meter,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_plan_table(totals: &PlanResult) -> Table {
    let cheapest = totals.values().min().copied();
    let most_expensive = totals.values().max().copied();

    let mut table = new_table();
    table.set_header(vec!["Plan", "Total incl. GST"]);
    for (plan, total) in totals {
        let color = if Some(*total) == cheapest {
            Color::Green
        } else if Some(*total) == most_expensive {
            Color::Red
        } else {
            Color::Reset
        };
        table.add_row(vec![
            Cell::new(plan),
            Cell::new(total).set_alignment(CellAlignment::Right).fg(color),
        ]);
    }
    table
}

pub fn build_rates_table(stored: &RateParameters, resolved: &RateParameters) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Rate", "Stored", "Effective"]);
    for key in EnumSet::<RateKey>::all() {
        table.add_row(vec![
            Cell::new(key),
            format_rate(stored.get(key)).set_alignment(CellAlignment::Right),
            format_rate(resolved.get(key))
                .set_alignment(CellAlignment::Right)
                .fg(if resolved.get(key).is_some() { Color::Reset } else { Color::Red }),
        ]);
    }
    table
}

fn format_rate(value: Option<f64>) -> Cell {
    value.map_or_else(|| Cell::new("unset").add_attribute(Attribute::Dim), Cell::new)
}

pub fn build_profile_table(profile: &UsageProfile) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hour", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    for hour in 0..24 {
        let mut row = vec![Cell::new(format!("{hour:02}:00")).add_attribute(Attribute::Dim)];
        row.extend((0..7).map(|weekday| {
            profile.get(hour, weekday).map_or_else(
                || Cell::new("–").add_attribute(Attribute::Dim),
                |value| Cell::new(format!("{:.3}", value.0)).set_alignment(CellAlignment::Right),
            )
        }));
        table.add_row(row);
    }
    table
}

pub fn build_meters_table(meters: &[Meter]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Account", "Contract"]);
    for meter in meters {
        table.add_row(vec![
            Cell::new(meter.id).add_attribute(Attribute::Dim),
            Cell::new(&meter.account_number),
            Cell::new(&meter.contract_id),
        ]);
    }
    table
}

pub fn build_accounts_table(accounts: &Accounts) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Account", "Contracts"]);
    for (account_number, contract_ids) in accounts {
        table.add_row(vec![Cell::new(account_number), Cell::new(contract_ids.join(", "))]);
    }
    table
}
