//! Write a demo workbook to try the radar with.
//!
//! Usage: sample [OUTPUT.xlsx]

use rust_xlsxwriter::{Format, Workbook, XlsxError};

const COLUMNS: [&str; 6] = [
    "Maîtrise technique",
    "Communication",
    "Autonomie",
    "Travail en équipe",
    "Connaissance du domaine métier et des processus internes",
    "Gestion de projet",
];

const ROWS: [(&str, [f64; 6]); 4] = [
    ("Alice", [4.5, 3.0, 4.0, 3.5, 2.0, 3.25]),
    ("Bruno", [2.0, 4.5, 3.0, 4.0, 3.5, 2.5]),
    ("Chloé", [3.5, 3.5, 4.5, 2.0, 4.0, 4.75]),
    ("David", [1.5, 2.0, 2.5, 4.5, 1.0, 3.0]),
];

fn main() -> Result<(), XlsxError> {
    let output = std::env::args().nth(1).unwrap_or_else(|| "matrice-demo.xlsx".to_string());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    sheet.write_string_with_format(0, 0, "Ressource", &bold)?;
    for (c, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16 + 1, *name, &bold)?;
    }
    for (r, (label, values)) in ROWS.iter().enumerate() {
        let row = r as u32 + 1;
        sheet.write_string(row, 0, *label)?;
        for (c, value) in values.iter().enumerate() {
            sheet.write_number(row, c as u16 + 1, *value)?;
        }
    }

    workbook.save(&output)?;
    eprintln!("Wrote {}", output);
    Ok(())
}
