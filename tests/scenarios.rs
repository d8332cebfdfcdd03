use amqp_value::codec::{decode, encode};
use amqp_value::descriptor::Descriptor;
use amqp_value::described::Described;
use amqp_value::error::Error;
use amqp_value::message::{AnnotationKey, Body, Message};
use amqp_value::primitives::{Binary, Timestamp, Uuid};
use amqp_value::value::{Array, Tag, Value};

#[test]
fn s1_primitives_round_trip() {
    let values = vec![
        Value::Null,
        Value::Bool(true),
        Value::UByte(255),
        Value::Long(-1),
        Value::from(1.5f32),
        Value::Timestamp(Timestamp::from_milliseconds(1_700_000_000_000)),
        Value::Uuid(Uuid::from([
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ])),
    ];
    let mut buf = vec![0u8; 256];
    let len = encode(&values, &mut buf).unwrap();
    let mut offset = 0;
    for expected in &values {
        let (decoded, consumed) = decode(&buf[offset..len]).unwrap();
        assert_eq!(&decoded, expected);
        offset += consumed;
    }
    assert_eq!(offset, len);

    let mut short_buf = vec![0u8; 8];
    let short_len = encode(&[Value::Short(-1)], &mut short_buf).unwrap();
    assert_eq!(&short_buf[..short_len], &[0x61, 0xff, 0xff]);
}

#[test]
fn s2_nested_composite_round_trips_and_preserves_order() {
    let mut arr = Array::new(Tag::Int);
    arr.push(Value::Int(1)).unwrap();
    arr.push(Value::Int(2)).unwrap();
    arr.push(Value::Int(3)).unwrap();

    let map = Value::Map(vec![
        Value::String("a".into()),
        Value::List(vec![Value::Int(1), Value::String("x".into()), Value::Null]),
        Value::String("b".into()),
        Value::Array(arr),
    ]);

    let mut buf = vec![0u8; 1024];
    let len = encode(&[map.clone()], &mut buf).unwrap();
    let (decoded, consumed) = decode(&buf[..len]).unwrap();
    assert_eq!(consumed, len);
    assert_eq!(decoded, map);

    match decoded {
        Value::Map(items) => {
            assert_eq!(items[0], Value::String("a".into()));
            assert_eq!(items[2], Value::String("b".into()));
            match &items[3] {
                Value::Array(arr) => assert_eq!(arr.element_tag(), Tag::Int),
                other => panic!("expected array, got {other:?}"),
            }
        }
        other => panic!("expected map, got {other:?}"),
    }
}

#[test]
fn s3_described_round_trips_and_unmarshals_plain() {
    let described = Value::Described(Box::new(Described::new(
        0x73u64,
        Value::List(vec![Value::String("queue-a".into()), Value::Int(4)]),
    )));

    let mut buf = vec![0u8; 256];
    let len = encode(&[described.clone()], &mut buf).unwrap();
    let (decoded, _) = decode(&buf[..len]).unwrap();
    assert_eq!(decoded, described);

    let as_list: Vec<Value> = decoded.try_into().unwrap();
    assert_eq!(as_list, vec![Value::String("queue-a".into()), Value::Int(4)]);
}

#[test]
fn s4_message_annotation_lazy_cache_round_trips() {
    let mut msg = Message::new();
    msg.annotations()
        .unwrap()
        .insert(AnnotationKey::Symbol("x".into()), Value::Int(1));

    let bytes = msg.encode_grow().unwrap();

    let mut decoded = Message::new();
    decoded.decode(&bytes).unwrap();
    let map = decoded.annotations().unwrap();
    assert_eq!(map.get(&AnnotationKey::Symbol("x".into())), Some(&Value::Int(1)));
}

#[test]
fn s5_grows_by_doubling_from_512() {
    let mut msg = Message::new();
    msg.body = Some(Body::Data(Binary(vec![0u8; 10_000])));

    for size in [512usize, 1024, 2048, 4096, 8192] {
        let mut buf = vec![0u8; size];
        assert!(
            matches!(msg.encode(&mut buf), Err(Error::Overflow)),
            "expected overflow at buffer size {size}"
        );
    }

    let mut buf = vec![0u8; 16_384];
    let len = msg.encode(&mut buf).unwrap();
    assert!(len <= 16_384);

    let grown = msg.encode_grow().unwrap();
    assert_eq!(grown.len(), len);
}

#[test]
fn s6_underflow_until_complete_then_succeeds() {
    let value = Value::String("a".repeat(38));
    let mut buf = vec![0u8; 64];
    let len = encode(&[value], &mut buf).unwrap();
    assert_eq!(len, 40);

    for k in 1..40 {
        match decode(&buf[..k]) {
            Err(Error::Underflow) => {}
            other => panic!("expected underflow at k={k}, got {other:?}"),
        }
    }

    let (_, consumed) = decode(&buf[..40]).unwrap();
    assert_eq!(consumed, 40);
}

#[test]
fn descriptor_round_trips_as_code() {
    let descriptor: Descriptor = 0x70u64.into();
    assert_eq!(descriptor, Descriptor::Code(0x70));
}
