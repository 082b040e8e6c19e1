use crate::data::{OwnerData, Persistable};
use anyhow::Result;

pub fn run() -> Result<()> {
    let owners = OwnerData::load()?;
    write_owners(&owners, &mut std::io::stdout())
}

pub(crate) fn write_owners<W: std::io::Write>(data: &OwnerData, out: &mut W) -> Result<()> {
    writeln!(out, "Staff and clients")?;
    writeln!(out, "---")?;
    writeln!(out, "  {:<4} {:<12} {}", "#", "Id", "Name")?;
    for (i, o) in data.owners.iter().enumerate() {
        writeln!(out, "  {:<4} {:<12} {}", i + 1, o.id, o.display_name)?;
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} owner(s)", data.owners.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Owner;

    #[test]
    fn test_write_owners_lists_each() {
        let data = OwnerData {
            owners: vec![
                Owner::new("cw-001", "Amara Okafor"),
                Owner::new("cl-100", "Edith Marsh"),
            ],
        };
        let mut buf = Vec::new();
        write_owners(&data, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("cw-001"));
        assert!(out.contains("Edith Marsh"));
        assert!(out.contains("Total: 2 owner(s)"));
    }

    #[test]
    fn test_write_owners_empty() {
        let mut buf = Vec::new();
        write_owners(&OwnerData::default(), &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("Total: 0 owner(s)"));
    }
}
