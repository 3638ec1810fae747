//! Table rendering for list views.

use comfy_table::{ContentArrangement, Table};
use frostkeep_core::api::types::{Category, CsvRow, Item, UserAccount};

fn base_table() -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub(crate) fn items_table(items: &[Item]) -> Table {
    let mut table = base_table();
    table.set_header(["ID", "Name", "Category", "Quantity", "Expiry", "Status"]);
    for item in items {
        table.add_row([
            item.id.to_string(),
            item.name.clone(),
            item.category_name.clone(),
            format!("{} {}", item.quantity, item.unit),
            item.expiry_date
                .map_or_else(|| "-".to_string(), |date| date.to_string()),
            expiry_status(item),
        ]);
    }
    table
}

fn expiry_status(item: &Item) -> String {
    if item.expired {
        return "expired".to_string();
    }
    if item.expiring_soon {
        return match item.days_until_expiry {
            Some(days) => format!("expires in {days}d"),
            None => "expiring soon".to_string(),
        };
    }
    String::new()
}

pub(crate) fn categories_table(categories: &[Category]) -> Table {
    let mut table = base_table();
    table.set_header(["ID", "Name", "Icon", "Unit", "Step", "Min", "Max"]);
    for category in categories {
        table.add_row([
            category.id.to_string(),
            category.name.clone(),
            category.icon.clone().unwrap_or_default(),
            category.default_unit.clone(),
            category.unit_step.to_string(),
            category.min_value.to_string(),
            category.max_value.to_string(),
        ]);
    }
    table
}

pub(crate) fn accounts_table(accounts: &[UserAccount]) -> Table {
    let mut table = base_table();
    table.set_header(["ID", "Username", "Email", "Role"]);
    for account in accounts {
        table.add_row([
            account.id.to_string(),
            account.username.clone(),
            account.email.clone(),
            account.role.clone(),
        ]);
    }
    table
}

pub(crate) fn csv_preview_table(rows: &[CsvRow]) -> Table {
    let mut table = base_table();
    table.set_header(["Row", "Name", "Category", "Quantity", "Unit", "Expiry", "Problems"]);
    for row in rows {
        table.add_row([
            row.row_number.to_string(),
            row.name.clone(),
            row.category_name.clone(),
            row.quantity.map_or_else(String::new, |q| q.to_string()),
            row.unit.clone(),
            row.expiry_date
                .map_or_else(|| "-".to_string(), |date| date.to_string()),
            row.errors.join("; "),
        ]);
    }
    table
}
