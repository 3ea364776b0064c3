use sbe_format::frame::{
    FrameError, MIN_RESPONSE_LEN, PrimaryStatus, SecondaryStatus, parse_response,
};
use sbe_format::writer::ResponseBuilder;

fn trailer(buf: &mut Vec<u8>, words: u32) {
    buf.extend_from_slice(&words.to_be_bytes());
}

#[test]
fn test_buffer_too_small() {
    for len in 0..MIN_RESPONSE_LEN {
        let buf = vec![0u8; len];
        assert_eq!(
            parse_response(&buf, true),
            Err(FrameError::BufferTooSmall { len })
        );
    }
}

#[test]
fn test_recovers_header_offset_and_status() {
    for value_len in [0usize, 4, 5, 32] {
        let builder = ResponseBuilder {
            value: (0..value_len as u8).collect(),
            primary: PrimaryStatus::InvalidData,
            secondary: SecondaryStatus::SpecifiedTargetNotFunctional,
            ..Default::default()
        };
        let buf = builder.build().unwrap();

        let frame = parse_response(&buf, false).unwrap();
        assert_eq!(frame.header_offset, value_len);
        assert_eq!(frame.value, builder.value);
        assert_eq!(frame.primary_status, PrimaryStatus::InvalidData);
        assert_eq!(frame.secondary_status, SecondaryStatus::SpecifiedTargetNotFunctional);
        assert_eq!(frame.ffdc_region, None);
        assert!(!frame.is_success());
    }
}

#[test]
fn test_distance_larger_than_buffer() {
    let mut buf = vec![0xC0, 0xDE, 0x00, 0x00, 0, 0, 0, 0];
    trailer(&mut buf, 4);
    assert_eq!(
        parse_response(&buf, true),
        Err(FrameError::InvalidHeaderOffset {
            distance_words: 4,
            len: 12
        })
    );
}

#[test]
fn test_distance_overflowing_multiplication() {
    let mut buf = vec![0u8; 8];
    trailer(&mut buf, u32::MAX);
    assert!(matches!(
        parse_response(&buf, true),
        Err(FrameError::InvalidHeaderOffset { .. })
    ));
}

#[test]
fn test_header_does_not_fit_before_end() {
    // Distance of one word puts the header on the trailing word itself.
    let mut buf = vec![0xC0, 0xDE, 0x00, 0x00, 0, 0, 0, 0];
    trailer(&mut buf, 1);
    assert!(matches!(
        parse_response(&buf, true),
        Err(FrameError::InvalidHeaderOffset { distance_words: 1, .. })
    ));
}

#[test]
fn test_zero_distance_rejected() {
    let mut buf = vec![0u8; 8];
    trailer(&mut buf, 0);
    assert!(matches!(
        parse_response(&buf, true),
        Err(FrameError::InvalidHeaderOffset { distance_words: 0, .. })
    ));
}

#[test]
fn test_invalid_magic() {
    let mut buf = vec![0xBA, 0xD0, 0x12, 0x34, 0, 0, 0, 0];
    trailer(&mut buf, 3);
    assert_eq!(
        parse_response(&buf, true),
        Err(FrameError::InvalidMagic { header: 0xBAD0_1234 })
    );
}

#[test]
fn test_ffdc_region_excludes_trailer() {
    let builder = ResponseBuilder {
        value: vec![0xAA; 8],
        ..Default::default()
    };
    let buf = builder.assemble(&[0x11; 12]);
    assert_eq!(buf.len(), 8 + 8 + 12 + 4);

    let frame = parse_response(&buf, true).unwrap();
    assert_eq!(frame.header_offset, 8);
    assert_eq!(frame.ffdc_region, Some(16..28));
    assert_eq!(&buf[16..28], &[0x11; 12]);
}

#[test]
fn test_status_word_as_last_word_yields_no_region() {
    // Distance of two words: header then status, where the status word
    // doubles as the trailing distance word.
    let buf = vec![0, 0, 0, 0, 0xC0, 0xDE, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02];
    let frame = parse_response(&buf, true).unwrap();
    assert_eq!(frame.header_offset, 4);
    assert_eq!(frame.ffdc_region, None);
    assert_eq!(frame.secondary_status, SecondaryStatus::CommandNotSupported);
}
