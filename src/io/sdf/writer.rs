use crate::io::{error::Error, util};
use crate::model::system::System;
use std::io::Write;

/// Writes one V2000 record terminated by `$$$$`.
pub fn write<W: Write>(mut writer: W, system: &System) -> Result<(), Error> {
    write_record(&mut writer, "", system)
}

/// Writes several records, each titled with its own name.
pub fn write_all<'a, W, I>(mut writer: W, records: I) -> Result<(), Error>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a System)>,
{
    for (title, system) in records {
        write_record(&mut writer, title, system)?;
    }
    Ok(())
}

fn write_record<W: Write>(writer: &mut W, title: &str, system: &System) -> Result<(), Error> {
    let atom_count = system.atom_count();
    let bond_count = system.bond_count();

    writeln!(writer, "{}", title.lines().next().unwrap_or(""))?;
    writeln!(writer, "  shape-forge")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        atom_count, bond_count
    )?;

    for atom in &system.atoms {
        writeln!(
            writer,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0{:>3}  0  0  0  0  0  0  0  0  0  0",
            atom.position[0],
            atom.position[1],
            atom.position[2],
            atom.element.symbol(),
            util::charge_to_ctfile(atom.formal_charge)
        )?;
    }

    for bond in &system.bonds {
        writeln!(
            writer,
            "{:>3}{:>3}{:>3}  0  0  0  0",
            bond.i + 1,
            bond.j + 1,
            util::bond_order_to_ctfile(bond.order)
        )?;
    }

    let charged: Vec<(usize, i8)> = system
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| a.formal_charge != 0)
        .map(|(i, a)| (i + 1, a.formal_charge))
        .collect();
    for chunk in charged.chunks(8) {
        write!(writer, "M  CHG{:>3}", chunk.len())?;
        for (idx, charge) in chunk {
            write!(writer, " {:>3} {:>3}", idx, charge)?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "M  END")?;
    writeln!(writer, "$$$$")?;
    Ok(())
}
