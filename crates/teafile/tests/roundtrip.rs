//! Round-trip tests through in-memory and on-disk streams.

use std::io::{Cursor, Seek, SeekFrom};

use chrono::{DateTime, TimeZone, Utc};
use teafile::{
    ByteOrder, Field, FieldKind, FieldType, Header, Item, NameValue, ReaderOptions, RecordSchema,
    Result, TeaError, TeaReader, TeaRecord, TeaWriter, Times, Value, read_tea_file, write_tea_file,
};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
struct Trade {
    time: DateTime<Utc>,
    price: f64,
    volume: i64,
    side: u8,
}

impl TeaRecord for Trade {
    fn schema() -> RecordSchema {
        RecordSchema::new("Trade")
            .timestamp("time")
            .field("price", FieldKind::Float64)
            .field("volume", FieldKind::Int64)
            .field("side", FieldKind::UInt8)
    }

    fn to_item(&self) -> Item {
        Item::new()
            .with("time", self.time)
            .with("price", self.price)
            .with("volume", self.volume)
            .with("side", self.side)
    }

    fn from_item(item: &Item) -> Result<Self> {
        Ok(Self {
            time: item.get_as("time")?,
            price: item.get_as("price")?,
            volume: item.get_as("volume")?,
            side: item.get_as("side")?,
        })
    }
}

fn trades() -> Vec<Trade> {
    (0..5)
        .map(|i| Trade {
            time: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, i).unwrap(),
            price: 101.25 + f64::from(i),
            volume: 100 * i64::from(i + 1),
            side: (i % 2) as u8,
        })
        .collect()
}

/// Write a header and items, then read everything back.
fn roundtrip(header: Header, items: &[Item]) -> (Header, Vec<Item>) {
    let mut writer = TeaWriter::new(Cursor::new(Vec::new()), header).unwrap();
    for item in items {
        writer.encode_item(item).unwrap();
    }
    let bytes = writer.finish_sealed().unwrap().into_inner();

    let mut reader = TeaReader::with_options(Cursor::new(bytes), ReaderOptions::new().strict())
        .unwrap();
    let mut read = Vec::new();
    reader.read_items_into(&mut read).unwrap();
    (reader.header().clone(), read)
}

fn tick_header() -> Header {
    Header {
        name: "Tick".to_string(),
        item_size: 9,
        fields: vec![
            Field::new("ts", FieldType::Int64, 0),
            Field::new("volume", FieldType::Int8, 8),
        ],
        times: Times {
            offsets: vec![0],
            ..Times::default()
        },
        ..Header::default()
    }
}

#[test]
fn test_tick_scenario() {
    let item = Item::new()
        .with("ts", Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
        .with("volume", 10i8);

    let mut writer = TeaWriter::new(Vec::new(), tick_header()).unwrap();
    let start = writer.bounds().start as usize;
    writer.encode_item(&item).unwrap();
    let bytes = writer.finish().unwrap();

    // header has an Item and a Time section only
    assert_eq!(&bytes[24..32], &2i64.to_le_bytes());
    assert_eq!(bytes.len() - start, 9);

    let mut reader = TeaReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.header(), &tick_header());
    assert_eq!(reader.decode_item().unwrap(), Some(item));
    assert_eq!(reader.decode_item().unwrap(), None);
}

#[test]
fn test_full_header_both_orders() {
    for order in [ByteOrder::Little, ByteOrder::Big] {
        let header = tick_header()
            .with_byte_order(order)
            .with_description("ACME trades on XETRA")
            .with_name_value(NameValue::int32("decimals", 2))
            .with_name_value(NameValue::double("tick size", 0.005))
            .with_name_value(NameValue::text("currency", "EUR"))
            .with_name_value(NameValue::uuid(
                "instrument",
                Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8),
            ));
        let items: Vec<Item> = (0..3i8)
            .map(|volume| {
                Item::new()
                    .with("ts", Utc.timestamp_millis_opt(i64::from(volume) * 250).unwrap())
                    .with("volume", volume)
            })
            .collect();

        let (read_header, read_items) = roundtrip(header.clone(), &items);
        assert_eq!(read_header, header);
        assert_eq!(read_items, items);
    }
}

#[test]
fn test_records_roundtrip() {
    let mut writer = TeaWriter::for_record::<Trade>(Cursor::new(Vec::new())).unwrap();
    assert_eq!(writer.write_records(&trades()).unwrap(), 5);
    assert_eq!(writer.header().item_size, 8 + 8 + 8 + 1);
    let bytes = writer.finish().unwrap().into_inner();

    let mut reader = TeaReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.header().name, "Trade");
    assert_eq!(reader.read_records::<Trade>().unwrap(), trades());
}

#[test]
fn test_custom_time_scale() {
    // .NET ticks: 100ns resolution counted from 0001-01-01
    let header = tick_header().with_time_scale(0, 864_000_000_000);
    let instant = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    let item = Item::new().with("ts", instant).with("volume", 1i8);

    let (read_header, items) = roundtrip(header, &[item]);
    assert_eq!(read_header.times.ticks_per_day, 864_000_000_000);
    assert_eq!(items[0].get("ts"), Some(&Value::Timestamp(instant)));
}

#[test]
fn test_secondary_time_field() {
    let layout = RecordSchema::new("Settlement")
        .timestamp("trade_time")
        .timestamp_at("settle_time", 8)
        .layout();
    // two timestamp marks are not allowed
    assert!(layout.is_err());

    let layout = RecordSchema::new("Settlement")
        .timestamp("trade_time")
        .field("settle_time", FieldKind::Timestamp)
        .layout()
        .unwrap();
    let header = Header::for_layout(&layout);
    assert_eq!(header.times.offsets, vec![0, 8]);

    let item = Item::new()
        .with("trade_time", Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        .with("settle_time", Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap());
    let (_, items) = roundtrip(header, std::slice::from_ref(&item));
    assert_eq!(items, vec![item]);
}

#[test]
fn test_seal_on_disk() {
    let file = tempfile::tempfile().unwrap();
    let mut writer = TeaWriter::for_record::<Trade>(file).unwrap();
    writer.write_records(&trades()).unwrap();
    let start = writer.bounds().start;
    let mut file = writer.finish_sealed().unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let mut reader = TeaReader::new(file).unwrap();
    assert_eq!(reader.bounds().start, start);
    assert_eq!(reader.bounds().end, start + 5 * 25);
    assert_eq!(reader.read_records::<Trade>().unwrap(), trades());
}

#[test]
fn test_file_helpers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trades.tea");
    let header = Header::for_layout(&Trade::schema().layout().unwrap())
        .with_description("helpers");
    let items: Vec<Item> = trades().iter().map(Trade::to_item).collect();

    write_tea_file(&path, header.clone(), &items).unwrap();
    let (read_header, read_items) = read_tea_file(&path).unwrap();
    assert_eq!(read_header, header);
    assert_eq!(read_items, items);

    let missing = dir.path().join("missing.tea");
    assert!(matches!(read_tea_file(&missing), Err(TeaError::Io { .. })));
}

#[test]
fn test_header_only_file() {
    let header = Header::default()
        .with_description("metadata only")
        .with_name_value(NameValue::text("source", "manual"));
    let writer = TeaWriter::new(Cursor::new(Vec::new()), header.clone()).unwrap();
    let bytes = writer.finish_sealed().unwrap().into_inner();

    let reader = TeaReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.header(), &header);
}
