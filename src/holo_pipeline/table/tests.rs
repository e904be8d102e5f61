use std::io::Cursor;

use crate::holo_pipeline::cast::Phase;
use crate::holo_pipeline::common::error::HoloError;
use crate::holo_pipeline::metadata::fixtures::sample_metadata;
use crate::holo_pipeline::metadata::MetadataRecord;
use crate::holo_pipeline::table::csv_writer::CsvTableWriter;
use crate::holo_pipeline::table::reader::{read_cast_table, read_cast_table_from};
use crate::holo_pipeline::table::types::{CastTable, SegmentedCast};
use crate::holo_pipeline::table::writer::{TableWriter, create_table_file};

fn sample_table() -> CastTable {
    (0..4)
        .map(|i| {
            MetadataRecord::from_binary(format!("HOLO_{:04}", i), sample_metadata(100 * i, 0.25, 1.0))
                .with_labels(Some("DY086".to_string()), Some("034".to_string()))
        })
        .collect()
}

fn to_csv(table: &CastTable) -> String {
    let mut output = Cursor::new(Vec::new());
    CsvTableWriter.write_metadata(table, &mut output).unwrap();
    String::from_utf8(output.into_inner()).unwrap()
}

#[test]
fn test_metadata_table_header_and_rows() {
    let csv = to_csv(&sample_table());
    let mut lines = csv.lines();

    let header = lines.next().unwrap();
    assert!(header.starts_with("Cruise,Event,Image,Datetime,Depth,Capture epoch,Pressure counts,"));
    assert!(header.ends_with("Inter-frame delay msec,Timestamp msec"));
    assert_eq!(lines.count(), 4);
}

#[test]
fn test_written_table_reloads() {
    let table = sample_table();
    let reloaded = read_cast_table_from(to_csv(&table).as_bytes()).unwrap();

    assert_eq!(reloaded, table);
}

#[test]
fn test_reload_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata").join("overview.csv");
    let table = sample_table();
    let mut file = create_table_file(&path).unwrap();
    CsvTableWriter.write_metadata(&table, &mut file).unwrap();
    drop(file);

    assert_eq!(read_cast_table(&path).unwrap().len(), 4);
}

#[test]
fn test_missing_required_column() {
    let csv = to_csv(&sample_table()).replacen("Depth,", "Altitude,", 1);
    let err = read_cast_table_from(csv.as_bytes()).unwrap_err();

    assert!(matches!(err, HoloError::MalformedTable(msg) if msg.contains("Depth")));
}

#[test]
fn test_absent_layout_column_loads_as_zero() {
    let csv = to_csv(&sample_table()).replacen("Pressure counts", "Pressure", 1);
    let reloaded = read_cast_table_from(csv.as_bytes()).unwrap();

    assert_eq!(reloaded.len(), 4);
    assert_eq!(reloaded.records()[2].binary.pressure_counts, 0);
    assert_eq!(reloaded.records()[2].depth, Some(51.0));
    assert_eq!(reloaded.records()[2].binary.depth_coefs[1], 0.25);
}

#[test]
fn test_invalid_layout_cell_rejected() {
    let mut csv = to_csv(&sample_table());
    csv.push_str("DY086,034,HOLO_0009,,1.0,x,1,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n");
    let err = read_cast_table_from(csv.as_bytes()).unwrap_err();

    assert!(matches!(err, HoloError::MalformedTable(msg) if msg.contains("Capture epoch")));
}

#[test]
fn test_reload_table_without_capture_epoch() {
    let csv = "Cruise,Event,Image,Datetime,Depth,Temperature,Pressure counts,Depth coef B\n\
               DY086,034,HOLO_0001,2023-11-14 22:13:20,12.5,,50,0.25\n\
               DY086,034,HOLO_0000,2023-11-14 22:13:19,10,,40,0.25\n";
    let reloaded = read_cast_table_from(csv.as_bytes()).unwrap();

    assert_eq!(reloaded.len(), 2);
    let first = &reloaded.records()[0];
    assert_eq!(first.image, "HOLO_0001");
    assert_eq!(first.depth, Some(12.5));
    assert_eq!(first.binary.capture_epoch, 0);
    assert_eq!(first.binary.pressure_counts, 50);
    assert_eq!(reloaded.records()[1].binary.depth_coefs[1], 0.25);
}

#[test]
fn test_empty_depth_loads_as_undefined() {
    let mut table = sample_table().into_records();
    table[1].depth = None;
    let reloaded = read_cast_table_from(to_csv(&CastTable::new(table)).as_bytes()).unwrap();

    assert_eq!(reloaded.records()[1].depth, None);
    assert_eq!(reloaded.records()[2].depth, Some(51.0));
}

#[test]
fn test_duplicate_identifier_rejected() {
    let mut records = sample_table().into_records();
    records[3].image = records[0].image.clone();
    let err = read_cast_table_from(to_csv(&CastTable::new(records)).as_bytes()).unwrap_err();

    assert!(matches!(err, HoloError::MalformedTable(_)));
}

#[test]
fn test_every_nth() {
    let table = sample_table();
    let images: Vec<String> = table
        .every_nth(3)
        .unwrap()
        .into_records()
        .into_iter()
        .map(|r| r.image)
        .collect();

    assert_eq!(images, ["HOLO_0000", "HOLO_0003"]);
    assert!(matches!(table.every_nth(0), Err(HoloError::InvalidParameter(_))));
}

#[test]
fn test_every_nth_strides_in_cast_order() {
    let mut records = sample_table().into_records();
    records.swap(0, 3);
    let unsorted = CastTable::new(records);
    assert!(!unsorted.is_sorted_by_identifier());

    let images: Vec<String> = unsorted
        .every_nth(2)
        .unwrap()
        .into_records()
        .into_iter()
        .map(|r| r.image)
        .collect();

    assert_eq!(images, ["HOLO_0000", "HOLO_0002"]);
}

#[test]
fn test_segmented_table_appends_derived_columns() {
    let table = sample_table();
    let smoothed = vec![Some(1.0), None, Some(3.5), Some(4.0)];
    let phases = vec![Phase::Initial, Phase::Return, Phase::Downcasting, Phase::Upcasting];
    let cast = SegmentedCast::new(table, smoothed, phases).unwrap();

    let mut output = Cursor::new(Vec::new());
    CsvTableWriter.write_segmented(&cast, &mut output).unwrap();
    let csv = String::from_utf8(output.into_inner()).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert!(lines[0].ends_with(",Smoothed_Depth,Phase"));
    assert!(lines[2].ends_with(",,Return"));
    assert!(lines[3].ends_with(",3.5,Downcasting"));
}
