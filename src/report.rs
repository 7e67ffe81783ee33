use std::{error::Error, io::Write};

use crate::geometry::{capsule::Capsule, helix::HelixChain};

/// One capsule of a chain, flattened for tabular output.
#[derive(serde::Serialize, Clone, Debug, PartialEq)]
pub struct CapsuleRecord {
    pub index: usize,
    pub bottom_x: f64,
    pub bottom_y: f64,
    pub bottom_z: f64,
    pub top_x: f64,
    pub top_y: f64,
    pub top_z: f64,
    pub translation_x: f64,
    pub translation_y: f64,
    pub translation_z: f64,
    pub axis_x: f64,
    pub axis_y: f64,
    pub axis_z: f64,
    pub angle: f64,
    pub length: f64,
    pub radius: f64,
}

impl CapsuleRecord {
    pub fn new(index: usize, capsule: &Capsule) -> Self {
        let (b, t) = (capsule.bottom(), capsule.top());
        let p = capsule.placement();
        CapsuleRecord {
            index,
            bottom_x: b.x,
            bottom_y: b.y,
            bottom_z: b.z,
            top_x: t.x,
            top_y: t.y,
            top_z: t.z,
            translation_x: p.translation.x,
            translation_y: p.translation.y,
            translation_z: p.translation.z,
            axis_x: p.rotation_axis.x,
            axis_y: p.rotation_axis.y,
            axis_z: p.rotation_axis.z,
            angle: p.rotation_angle,
            length: p.length,
            radius: capsule.radius,
        }
    }
}

pub fn chain_records(chain: &HelixChain) -> Vec<CapsuleRecord> {
    chain
        .iter()
        .enumerate()
        .map(|(i, c)| CapsuleRecord::new(i, c))
        .collect()
}

pub fn write_csv<W: Write>(records: &[CapsuleRecord], out: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(records: &[CapsuleRecord], out: W) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(out, records)?;
    Ok(())
}

pub fn write_text<W: Write>(records: &[CapsuleRecord], mut out: W) -> Result<(), Box<dyn Error>> {
    for r in records {
        writeln!(
            out,
            "{}: bottom=({:.3}, {:.3}, {:.3}) top=({:.3}, {:.3}, {:.3}) translation=({:.3}, {:.3}, {:.3}) axis=({:.4}, {:.4}, {:.4}) angle={:.4} length={:.3} radius={}",
            r.index,
            r.bottom_x,
            r.bottom_y,
            r.bottom_z,
            r.top_x,
            r.top_y,
            r.top_z,
            r.translation_x,
            r.translation_y,
            r.translation_z,
            r.axis_x,
            r.axis_y,
            r.axis_z,
            r.angle,
            r.length,
            r.radius,
        )?;
    }
    Ok(())
}
