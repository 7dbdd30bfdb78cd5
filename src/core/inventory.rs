use crate::domain::model::Vehicle;
use crate::utils::error::{MaestroError, Result};
use std::io::Read;
use std::path::Path;

pub const NO_CAR_DATA: &str = "No car data available";

const PRICE_ON_REQUEST: &str = "Contact for price";
const ZERO_PRICES: &[&str] = &["0", "0.0", "0.00", "$0", "$0.0", "$0.00"];
const UNAVAILABLE_VALUES: &[&str] = &["sold", "unavailable", "no", "false"];

/// Vehicle inventory loaded from a headered CSV file. All cells are kept as
/// text so the table renders exactly as the dealer wrote it.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    headers: Vec<String>,
    vehicles: Vec<Vehicle>,
}

impl Inventory {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(MaestroError::InventoryError {
                message: "inventory has no header row".to_string(),
            });
        }

        let mut vehicles = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(MaestroError::InventoryError {
                    message: format!(
                        "row {} has {} cells but the header has {} columns",
                        index + 1,
                        record.len(),
                        headers.len()
                    ),
                });
            }

            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = record.get(i).unwrap_or_default().to_string();
                    (header.clone(), value)
                })
                .collect();
            vehicles.push(Vehicle { fields });
        }

        tracing::debug!(
            "Parsed inventory with {} columns and {} vehicles",
            headers.len(),
            vehicles.len()
        );

        Ok(Self { headers, vehicles })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Vehicles not marked as sold or unavailable.
    pub fn available(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter().filter(|v| is_available(v))
    }

    /// Renders the inventory as a right-aligned text table without an index
    /// column, two spaces between columns.
    pub fn render_table(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .vehicles
            .iter()
            .map(|vehicle| {
                vehicle
                    .fields
                    .iter()
                    .map(|(header, value)| display_cell(header, value))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        std::iter::once(format_row(&self.headers, &widths))
            .chain(rows.iter().map(|row| format_row(row, &widths)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn prompt_section(&self) -> String {
        format!("Available car data:\n{}", self.render_table())
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ")
}

fn is_price_column(header: &str) -> bool {
    header.to_ascii_lowercase().contains("price")
}

fn is_availability_column(header: &str) -> bool {
    let header = header.to_ascii_lowercase();
    header.contains("status") || header.contains("available")
}

fn display_cell(header: &str, value: &str) -> String {
    if is_price_column(header) {
        let compact: String = value.chars().filter(|c| *c != ',').collect();
        if compact.is_empty() || ZERO_PRICES.contains(&compact.as_str()) {
            return PRICE_ON_REQUEST.to_string();
        }
    }
    value.to_string()
}

fn is_available(vehicle: &Vehicle) -> bool {
    !vehicle.fields.iter().any(|(header, value)| {
        is_availability_column(header)
            && UNAVAILABLE_VALUES
                .iter()
                .any(|v| value.eq_ignore_ascii_case(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARS: &str = "\
Brand,Model,Year,Price,Status
Toyota,Corolla,2022,21000,available
Honda,Civic,2023,0,available
Ford,Mustang,2021,45000,sold
";

    #[test]
    fn test_parse_inventory() {
        let inventory = Inventory::from_reader(CARS.as_bytes()).unwrap();
        assert_eq!(inventory.headers(), &["Brand", "Model", "Year", "Price", "Status"]);
        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory.vehicles()[2].get("model"), Some("Mustang"));
    }

    #[test]
    fn test_render_table_right_aligns_columns() {
        let csv = "Brand,Model\nToyota,RAV4\nKia,Sportage\n";
        let inventory = Inventory::from_reader(csv.as_bytes()).unwrap();
        let table = inventory.render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], " Brand     Model");
        assert_eq!(lines[1], "Toyota      RAV4");
        assert_eq!(lines[2], "   Kia  Sportage");
    }

    #[test]
    fn test_zero_price_renders_as_contact_for_price() {
        let inventory = Inventory::from_reader(CARS.as_bytes()).unwrap();
        let table = inventory.render_table();
        assert!(table.contains("Contact for price"));
        assert!(table.contains("21000"));
        assert!(!table.lines().nth(2).unwrap().contains("  0  "));
    }

    #[test]
    fn test_missing_and_dollar_zero_prices_render_as_contact_for_price() {
        let csv = "\
Brand,Model,Price
Kia,Rio,
Kia,Soul,$0
Kia,Niro,$0.00
Kia,EV6,\"$1,000\"
";
        let inventory = Inventory::from_reader(csv.as_bytes()).unwrap();
        let table = inventory.render_table();
        let rows: Vec<&str> = table.lines().skip(1).collect();

        for row in &rows[..3] {
            assert!(row.ends_with("Contact for price"), "row was {:?}", row);
        }
        assert!(rows[3].ends_with("$1,000"));
        assert!(!table.contains("$0"));
    }

    #[test]
    fn test_available_column_accepts_no_and_false() {
        let csv = "\
Brand,Model,Available
Audi,A4,yes
Audi,A6,no
Audi,Q5,FALSE
Audi,Q7,true
";
        let inventory = Inventory::from_reader(csv.as_bytes()).unwrap();
        let available: Vec<_> = inventory.available().filter_map(|v| v.get("Model")).collect();
        assert_eq!(available, vec!["A4", "Q7"]);
        assert_eq!(inventory.len(), 4);
    }

    #[test]
    fn test_sold_vehicles_are_not_available() {
        let inventory = Inventory::from_reader(CARS.as_bytes()).unwrap();
        let available: Vec<_> = inventory.available().filter_map(|v| v.get("Model")).collect();
        assert_eq!(available, vec!["Corolla", "Civic"]);
        // Sold cars stay in the table so the assistant can say so.
        assert!(inventory.render_table().contains("Mustang"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let csv = "Brand,Model,Price\nMazda,CX-5\n";
        let inventory = Inventory::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(inventory.vehicles()[0].get("price"), Some(""));
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let csv = "Brand,Model\nMazda,CX-5,extra\n";
        let err = Inventory::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, MaestroError::InventoryError { .. }));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(Inventory::from_reader("".as_bytes()).is_err());
    }

    #[test]
    fn test_prompt_section_prefix() {
        let inventory = Inventory::from_reader(CARS.as_bytes()).unwrap();
        assert!(inventory.prompt_section().starts_with("Available car data:\n"));
    }
}
