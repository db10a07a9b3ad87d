use std::collections::BTreeMap;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        appliance::ApplianceReport,
        engine::TierImpact,
        flag::TariffFlag,
        period::MonthPeriod,
        stats::ConsumptionStats,
    },
    fmt::FormattedPercentage,
    quantity::{cost::Cost, energy::KilowattHours},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_readings_table(period: &MonthPeriod) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Date", "Reading", "Consumption"]);
    table.add_row(vec![
        Cell::new("initial").add_attribute(Attribute::Dim),
        Cell::new(period.key).add_attribute(Attribute::Dim),
        Cell::new(period.initial_reading).set_alignment(CellAlignment::Right),
        Cell::new(KilowattHours::ZERO)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
    ]);
    for reading in &period.readings {
        let consumption =
            reading.consumption.unwrap_or_else(|| reading.value - period.initial_reading);
        table.add_row(vec![
            Cell::new(reading.id).add_attribute(Attribute::Dim),
            Cell::new(reading.date.format("%a %b %d")),
            Cell::new(reading.value).set_alignment(CellAlignment::Right),
            Cell::new(consumption).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_stats_table(period: &MonthPeriod, stats: &ConsumptionStats) -> Table {
    let mut table = new_table();
    table.set_header(vec![Cell::new(period.key), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Flag"),
        Cell::new(period.tariff_flag).fg(period.tariff_flag.color()),
    ]);
    table.add_row(vec![
        Cell::new("Initial reading"),
        Cell::new(period.initial_reading).set_alignment(CellAlignment::Right),
    ]);
    if let Some(reading_day) = period.reading_day {
        table.add_row(vec![
            Cell::new("Reading day"),
            Cell::new(reading_day).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Consumption"),
        Cell::new(stats.total_consumption).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Average per reading"),
        Cell::new(stats.average_daily_consumption)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
    ]);
    table.add_row(vec![
        Cell::new("Projection"),
        Cell::new(stats.monthly_projection).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Estimated cost").add_attribute(Attribute::Bold),
        Cell::new(stats.estimated_cost)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn build_tiers_table(costs: &BTreeMap<TariffFlag, Cost>, active_flag: TariffFlag) -> Table {
    let active_cost = costs.get(&active_flag).copied().unwrap_or(Cost::ZERO);
    let mut table = new_table();
    table.set_header(vec!["Flag", "Cost", "Difference"]);
    for (flag, cost) in costs {
        let difference = *cost - active_cost;
        let mut flag_cell = Cell::new(flag).fg(flag.color());
        if *flag == active_flag {
            flag_cell = flag_cell.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            flag_cell,
            Cell::new(cost).set_alignment(CellAlignment::Right),
            Cell::new(difference).set_alignment(CellAlignment::Right).fg(
                if difference >= Cost::ONE_CENT {
                    Color::Red
                } else if difference <= -Cost::ONE_CENT {
                    Color::Green
                } else {
                    Color::Reset
                },
            ),
        ]);
    }
    table
}

pub fn build_impact_table(impact: &TierImpact) -> Table {
    let mut table = new_table();
    table.set_header(vec!["From", "To", "Difference", "Change"]);
    let color = if impact.difference > Cost::ZERO { Color::Red } else { Color::Green };
    table.add_row(vec![
        Cell::new(impact.from).fg(impact.from.color()),
        Cell::new(impact.to).fg(impact.to.color()),
        Cell::new(impact.difference).set_alignment(CellAlignment::Right).fg(color),
        Cell::new(FormattedPercentage(impact.percentage))
            .set_alignment(CellAlignment::Right)
            .fg(color),
    ]);
    table
}

pub fn build_appliances_table(report: &ApplianceReport) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Appliance", "Consumption", "Energy cost", "Share"]);
    for appliance in &report.appliances {
        table.add_row(vec![
            Cell::new(&appliance.name),
            Cell::new(appliance.monthly_consumption).set_alignment(CellAlignment::Right),
            Cell::new(appliance.energy_cost).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", appliance.share * 100.0))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("Total at {}", report.flag))
            .fg(report.flag.color())
            .add_attribute(Attribute::Bold),
        Cell::new(report.total_consumption)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
        Cell::new(report.estimated_cost)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table
}
