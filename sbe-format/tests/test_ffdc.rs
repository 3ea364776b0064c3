use pretty_assertions::assert_eq;
use sbe_format::ffdc::{FFDC_HEADER_LEN, FfdcError, parse_ffdc_packages, parse_response_with_ffdc};
use sbe_format::frame::{FrameError, PrimaryStatus, SecondaryStatus};
use sbe_format::writer::{ResponseBuilder, encode_package};
use sbe_format::{FfdcPackage, Severity};

fn package(log_id: u16, sequence_id: u16, data: Vec<u8>) -> FfdcPackage {
    FfdcPackage {
        log_id,
        sequence_id,
        command_class: 0xA8,
        command: 0x01,
        severity: Severity::Unrecoverable,
        chip_id: 1,
        return_code: 0x00C0_FFEE,
        data,
    }
}

#[test]
fn test_single_package_roundtrip() {
    let pkg = package(7, 1, vec![0xAB; 8]);
    let region = encode_package(&pkg).unwrap();

    let map = parse_ffdc_packages(&region, 0..region.len()).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(7).unwrap(), &[pkg]);
}

#[test]
fn test_data_length_follows_declared_words() {
    let pkg = package(1, 1, vec![]);
    let region = encode_package(&pkg).unwrap();
    assert_eq!(region.len(), FFDC_HEADER_LEN);

    let map = parse_ffdc_packages(&region, 0..region.len()).unwrap();
    assert!(map.get(1).unwrap()[0].data.is_empty());
}

#[test]
fn test_grouping_preserves_buffer_order() {
    let packages = vec![
        package(5, 1, vec![1, 1, 1, 1]),
        package(3, 2, vec![2, 2, 2, 2]),
        package(5, 3, vec![3, 3, 3, 3]),
    ];
    let buf = ResponseBuilder {
        packages: packages.clone(),
        ..Default::default()
    }
    .build()
    .unwrap();

    let (frame, map) = parse_response_with_ffdc(&buf).unwrap();
    assert!(frame.is_success());
    assert_eq!(map.len(), 2);
    assert_eq!(map.log_ids().collect::<Vec<_>>(), vec![5, 3]);

    let five = map.get(5).unwrap();
    assert_eq!(five.len(), 2);
    assert_eq!(five[0].sequence_id, 1);
    assert_eq!(five[1].sequence_id, 3);
    assert_eq!(map.get(3).unwrap(), &[packages[1].clone()]);
}

#[test]
fn test_corrupt_second_package_fails_whole_region() {
    let first = encode_package(&package(1, 1, vec![0; 4])).unwrap();
    let mut second = encode_package(&package(2, 2, vec![0; 4])).unwrap();
    second[0] = 0xDE;
    second[1] = 0xAD;

    let mut region = first.clone();
    region.extend(second);

    let result = parse_ffdc_packages(&region, 0..region.len());
    assert_eq!(
        result,
        Err(FfdcError::InvalidPackageMagic {
            offset: first.len(),
            magic: 0xDEAD
        })
    );
}

#[test]
fn test_length_below_header_rejected() {
    let mut region = encode_package(&package(1, 1, vec![])).unwrap();
    region[3] = 3;
    assert_eq!(
        parse_ffdc_packages(&region, 0..region.len()),
        Err(FfdcError::PackageTooShort {
            offset: 0,
            length_words: 3
        })
    );
}

#[test]
fn test_package_overrunning_region_rejected() {
    let region = encode_package(&package(1, 1, vec![0; 8])).unwrap();
    // Cut the region one word short of the declared length.
    let end = region.len() - 4;
    assert_eq!(
        parse_ffdc_packages(&region, 0..end),
        Err(FfdcError::PackageOverrunsBuffer {
            offset: 0,
            size: 24,
            end
        })
    );
}

#[test]
fn test_region_offset_inside_larger_buffer() {
    let mut buf = vec![0xEE; 6];
    buf.extend(encode_package(&package(9, 4, vec![5; 4])).unwrap());
    buf.extend([0xEE; 3]);

    let map = parse_ffdc_packages(&buf, 6..buf.len() - 3).unwrap();
    assert_eq!(map.package_count(), 1);
    assert_eq!(map.get(9).unwrap()[0].data, vec![5; 4]);
}

#[test]
fn test_response_without_ffdc_gives_empty_map() {
    let buf = ResponseBuilder {
        value: vec![1, 2, 3, 4],
        primary: PrimaryStatus::InternalError,
        secondary: SecondaryStatus::GenericFailureInExecution,
        ..Default::default()
    }
    .build()
    .unwrap();

    let (frame, map) = parse_response_with_ffdc(&buf).unwrap();
    assert_eq!(frame.value, vec![1, 2, 3, 4]);
    assert_eq!(frame.primary_status, PrimaryStatus::InternalError);
    assert!(map.is_empty());
}

#[test]
fn test_framing_error_propagates() {
    assert_eq!(
        parse_response_with_ffdc(&[0u8; 4]),
        Err(FfdcError::Frame(FrameError::BufferTooSmall { len: 4 }))
    );
}

#[test]
fn test_malformed_region_inside_response() {
    let mut bad = encode_package(&package(1, 1, vec![])).unwrap();
    bad[1] = 0x00;
    let buf = ResponseBuilder::default().assemble(&bad);
    assert!(matches!(
        parse_response_with_ffdc(&buf),
        Err(FfdcError::InvalidPackageMagic { offset: 8, magic: 0xFB00 })
    ));
}
