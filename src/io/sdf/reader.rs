use crate::io::{Format, error::Error, util};
use crate::model::{
    atom::Atom,
    system::{Bond, System},
};
use std::io::BufRead;

type Line = (usize, String);

/// Reads the first record of an SDF stream.
pub fn read<R: BufRead>(reader: R) -> Result<System, Error> {
    read_all(reader)?
        .into_iter()
        .next()
        .ok_or(Error::NoRecords(Format::Sdf))
}

/// Reads every record of a multi-record SDF stream, in order.
///
/// Records are separated by `$$$$`. Data items after `M  END` are skipped.
/// Blank records (for example a trailing newline after the last separator)
/// are ignored.
pub fn read_all<R: BufRead>(reader: R) -> Result<Vec<System>, Error> {
    let mut systems = Vec::new();
    let mut block: Vec<Line> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let content = line?;
        if content.trim() == "$$$$" {
            if !is_blank(&block) {
                systems.push(parse_block(&block)?);
            }
            block.clear();
            continue;
        }
        block.push((i + 1, content));
    }

    if !is_blank(&block) {
        systems.push(parse_block(&block)?);
    }

    Ok(systems)
}

fn is_blank(block: &[Line]) -> bool {
    block.iter().all(|(_, l)| l.trim().is_empty())
}

fn parse_block(lines: &[Line]) -> Result<System, Error> {
    let first_line = lines.first().map(|(ln, _)| *ln).unwrap_or(1);
    if lines.len() < 4 {
        return Err(Error::parse(
            Format::Sdf,
            first_line,
            "SDF block must contain at least a header and counts line",
        ));
    }

    let counts_line_no = lines[3].0;
    let counts_line = &lines[3].1;
    if counts_line.contains("V3000") {
        return Err(Error::parse(
            Format::Sdf,
            counts_line_no,
            "V3000 is not supported",
        ));
    }

    let (atom_count, bond_count) = parse_counts(counts_line, counts_line_no)?;
    let atom_start = 4;
    let bond_start = atom_start + atom_count;
    let props_start = bond_start + bond_count;

    if lines.len() < props_start {
        return Err(Error::parse(
            Format::Sdf,
            lines.last().map(|(ln, _)| *ln).unwrap_or(counts_line_no),
            "SDF block ended before atoms/bonds were fully specified",
        ));
    }

    let mut atoms = parse_atoms(&lines[atom_start..bond_start])?;
    let bonds = parse_bonds(&lines[bond_start..props_start], atom_count)?;
    apply_charge_properties(&lines[props_start..], &mut atoms)?;

    Ok(System { atoms, bonds })
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), Error> {
    let padded = format!("{line:<6}");
    let (atoms, bonds) = (field(&padded, 0, 3), field(&padded, 3, 6));
    let atoms = atoms
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid atom count"))?;
    let bonds = bonds
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Sdf, line_no, "invalid bond count"))?;
    Ok((atoms, bonds))
}

fn field(padded: &str, start: usize, end: usize) -> &str {
    padded.get(start..end).map(str::trim).unwrap_or("")
}

fn parse_atoms(lines: &[Line]) -> Result<Vec<Atom>, Error> {
    let mut atoms = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<40}");
        let coord = |start: usize, axis: &str| {
            field(&padded, start, start + 10)
                .parse::<f64>()
                .map_err(|_| {
                    Error::parse(
                        Format::Sdf,
                        *ln,
                        format!("invalid {axis} coordinate in atom line"),
                    )
                })
        };
        let position = [coord(0, "x")?, coord(10, "y")?, coord(20, "z")?];

        let element = util::guess_element_symbol(field(&padded, 31, 34))
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unable to infer element symbol"))?;

        let charge_field = field(&padded, 36, 39);
        let charge = if charge_field.is_empty() {
            0
        } else {
            charge_field
                .parse::<i32>()
                .ok()
                .and_then(util::charge_from_ctfile)
                .ok_or_else(|| Error::parse(Format::Sdf, *ln, "invalid charge code in atom line"))?
        };

        atoms.push(Atom::new(element, position).with_charge(charge));
    }
    Ok(atoms)
}

fn parse_bonds(lines: &[Line], atom_count: usize) -> Result<Vec<Bond>, Error> {
    let mut bonds = Vec::with_capacity(lines.len());
    for (ln, raw) in lines {
        let padded = format!("{raw:<9}");
        let a1 = field(&padded, 0, 3)
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid first atom index"))?;
        let a2 = field(&padded, 3, 6)
            .parse::<usize>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid second atom index"))?;
        let order_val = field(&padded, 6, 9)
            .parse::<i32>()
            .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid bond order value"))?;

        let order = util::bond_order_from_ctfile(order_val)
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "unsupported bond order in bond line"))?;

        if a1 == 0 || a2 == 0 || a1 > atom_count || a2 > atom_count {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "bond references atom outside declared range",
            ));
        }

        bonds.push(Bond::new(a1 - 1, a2 - 1, order));
    }
    Ok(bonds)
}

/// Applies `M  CHG` lines. Their presence resets every atom-block charge.
fn apply_charge_properties(lines: &[Line], atoms: &mut [Atom]) -> Result<(), Error> {
    let mut reset = false;
    for (ln, raw) in lines {
        if raw.starts_with("M  END") {
            break;
        }
        if !raw.starts_with("M  CHG") {
            continue;
        }

        if !reset {
            atoms.iter_mut().for_each(|a| a.formal_charge = 0);
            reset = true;
        }

        let tokens: Vec<&str> = raw[6..].split_whitespace().collect();
        let entries = tokens
            .first()
            .and_then(|t| t.parse::<usize>().ok())
            .ok_or_else(|| Error::parse(Format::Sdf, *ln, "invalid entry count in M  CHG line"))?;
        if tokens.len() < 1 + 2 * entries {
            return Err(Error::parse(
                Format::Sdf,
                *ln,
                "M  CHG line has fewer entries than declared",
            ));
        }

        for pair in tokens[1..1 + 2 * entries].chunks(2) {
            let idx = pair[0]
                .parse::<usize>()
                .ok()
                .filter(|&i| i >= 1 && i <= atoms.len())
                .ok_or_else(|| Error::parse(Format::Sdf, *ln, "M  CHG references unknown atom"))?;
            let charge = pair[1]
                .parse::<i8>()
                .map_err(|_| Error::parse(Format::Sdf, *ln, "invalid charge in M  CHG line"))?;
            atoms[idx - 1].formal_charge = charge;
        }
    }
    Ok(())
}
