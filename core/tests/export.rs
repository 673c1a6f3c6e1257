mod common;

use common::reference_input;
use pipeline_core::{
    export::{pipeline_row, write_pipeline_csv, PIPELINE_HEADERS},
    funnel::calculate,
};

#[test]
fn pipeline_csv_has_header_and_rounded_values() {
    let out = calculate(&reference_input()).unwrap();
    let mut buf = Vec::new();
    write_pipeline_csv(&mut buf, &out).unwrap();

    let mut reader = csv::Reader::from_reader(buf.as_slice());
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, PIPELINE_HEADERS.map(String::from).to_vec());

    let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().unwrap();
    assert_eq!(records.len(), 1);
    let row: Vec<&str> = records[0].iter().collect();
    assert_eq!(
        row,
        vec![
            "333", "200", "100", "33", "333", "952", "15,873", "167", "556", "18,519", "33",
            "1,449", "6,588", "39,683", "46,296", "16,469", "Exceeds capacity", "OK",
            "$5,000,000",
        ]
    );
}

#[test]
fn call_responses_column_holds_answered_calls() {
    let out = calculate(&reference_input()).unwrap();
    let row = pipeline_row(&out);
    let column = |header: &str| PIPELINE_HEADERS.iter().position(|h| *h == header).unwrap();
    assert_eq!(row[column("Total Responses from Calls")], "1,449");
    assert_eq!(row[column("Phone Contacts Required")], "6,588");
    assert!(out.call.total_responses < out.call.dials);
}
