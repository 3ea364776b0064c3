use errl_ir::*;
use ffdc_pel::factory::SBE_BOOT_FAILURE;
use ffdc_pel::{
    AggregateOptions, ChipInfo, DecodeError, FfdcFileList, ProcessError, RawDataDecoder,
    SeverityMerge, process_sbe_ffdc, sbe_boot_failure,
};
use pretty_assertions::assert_eq;
use sbe_format::frame::{FrameError, PrimaryStatus, SecondaryStatus};
use sbe_format::writer::{ResponseBuilder, encode_package};
use sbe_format::{FfdcError, FfdcPackage};
use target_tree::parse_tree;

const RC_CORE_CHECKSTOP: u32 = 0x00AB_0001;
const CORE0: [u8; 8] = [0x23, 0x01, 0x00, 0x02, 0x00, 0x07, 0x00, 0x00];

fn package(log_id: u16, severity: Severity, return_code: u32) -> FfdcPackage {
    FfdcPackage {
        log_id,
        sequence_id: 1,
        command_class: 0xA8,
        command: 0x01,
        severity,
        chip_id: 0,
        return_code,
        data: vec![0xCA, 0xFE, 0xBA, 0xBE],
    }
}

fn core_decoder(rc: u32, _: &[u8], _: u32, _: ChipType) -> Result<HwpFfdc, DecodeError> {
    if rc != RC_CORE_CHECKSTOP {
        return Err(DecodeError::UnknownReturnCode(rc));
    }
    Ok(HwpFfdc {
        kind: FfdcKind::None,
        rc: "RC_CORE_CHECKSTOP".into(),
        rc_desc: "core checkstop during boot".into(),
        cdg_targets: vec![CdgTargetInfo {
            target_entity_path: CORE0.to_vec(),
            callout: true,
            priority: "HIGH".into(),
            deconfigure: true,
            guard: true,
            guard_type: "GARD_Fatal".into(),
        }],
        ..Default::default()
    })
}

#[test]
fn test_end_to_end_with_target_tree() {
    let tree = parse_tree(include_str!("../../test-fixtures/targets/system.yml")).unwrap();
    let buf = ResponseBuilder {
        value: vec![0x11, 0x22, 0x33, 0x44],
        primary: PrimaryStatus::InternalError,
        secondary: SecondaryStatus::Other(0x0011),
        packages: vec![package(0x20, Severity::Unrecoverable, RC_CORE_CHECKSTOP)],
        ..Default::default()
    }
    .build()
    .unwrap();

    let options = AggregateOptions {
        chip_position: 1,
        ..Default::default()
    };
    let processed = process_sbe_ffdc(&buf, &core_decoder, &tree, &options).unwrap();
    assert_eq!(processed.primary_status, PrimaryStatus::InternalError);
    assert_eq!(processed.secondary_status, SecondaryStatus::Other(0x0011));
    assert_eq!(processed.value, vec![0x11, 0x22, 0x33, 0x44]);
    assert_eq!(processed.handle.len(), 1);

    let entry = &processed.handle.entries()[0];
    assert_eq!(entry.message(), SBE_BOOT_FAILURE);
    assert_eq!(entry.severity(), Severity::Unrecoverable);
    assert_eq!(entry.log_id(), Some(0x20));
    assert_eq!(
        entry.user_data_values("HWP_CDG_TGT_01_LOC_CODE").collect::<Vec<_>>(),
        vec!["U78DA.ND0.WZS0001-P0-C15"]
    );
    assert_eq!(entry.user_data().last().unwrap().1, "65536");
    assert_eq!(
        entry.callouts(),
        &[CalloutRecord::Target(TargetCallout {
            priority: Priority::H,
            deconfigured: true,
            guarded: true,
            guard_type: "GARD_Fatal".into(),
            entity_path: CORE0.to_vec(),
            mrus: vec![Mru {
                id: 513,
                priority: Priority::H
            }],
        })]
    );
    assert!(validate_handle(&processed.handle).is_ok());
}

#[test]
fn test_response_without_ffdc_is_an_error() {
    let buf = ResponseBuilder::default().build().unwrap();
    let err = process_sbe_ffdc(&buf, &RawDataDecoder, &EmptyTargets, &AggregateOptions::default())
        .unwrap_err();
    assert!(matches!(err, ProcessError::NoFfdcData));
}

#[test]
fn test_framing_errors_propagate() {
    let err = process_sbe_ffdc(
        &[0u8; 8],
        &RawDataDecoder,
        &EmptyTargets,
        &AggregateOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Response(FfdcError::Frame(FrameError::BufferTooSmall { len: 8 }))
    ));

    let mut buf = ResponseBuilder {
        packages: vec![package(1, Severity::Recovered, 1)],
        ..Default::default()
    }
    .build()
    .unwrap();
    buf[0] = 0xBA;
    let err = process_sbe_ffdc(&buf, &RawDataDecoder, &EmptyTargets, &AggregateOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Response(FfdcError::Frame(FrameError::InvalidMagic { .. }))
    ));
}

#[test]
fn test_malformed_region_yields_no_entries() {
    let good = encode_package(&package(1, Severity::Recovered, 1)).unwrap();
    let mut region = good.clone();
    region.extend(&good);
    // Corrupt the magic of the second package.
    region[good.len()] = 0x00;

    let buf = ResponseBuilder::default().assemble(&region);
    let err = process_sbe_ffdc(&buf, &RawDataDecoder, &EmptyTargets, &AggregateOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Response(FfdcError::InvalidPackageMagic { .. })
    ));
}

#[test]
fn test_sbe_boot_failure_attaches_raw_ffdc() {
    let pkg = package(3, Severity::Predictive, 0x0000_0042);
    let buf = ResponseBuilder {
        packages: vec![pkg.clone()],
        ..Default::default()
    }
    .build()
    .unwrap();
    let chip = ChipInfo {
        position: 0,
        chip_type: ChipType::Proc,
    };

    let handle = sbe_boot_failure(
        &chip,
        &buf,
        &RawDataDecoder,
        &EmptyTargets,
        SeverityMerge::Worst,
    )
    .unwrap();
    let entry = &handle.entries()[0];
    assert_eq!(entry.message(), SBE_BOOT_FAILURE);
    assert_eq!(entry.severity(), Severity::Predictive);
    assert_eq!(
        entry.user_data_values("HWP_FFDC_RAW_DATA").collect::<Vec<_>>(),
        vec!["CAFEBABE"]
    );
    assert_eq!(entry.attachment(), Some(encode_package(&pkg).unwrap().as_slice()));
}

#[test]
fn test_attachment_files() {
    let buf = ResponseBuilder {
        packages: vec![
            package(0x10, Severity::Recovered, 1),
            package(0x11, Severity::Unrecoverable, 2),
        ],
        ..Default::default()
    }
    .build()
    .unwrap();
    let chip = ChipInfo {
        position: 0,
        chip_type: ChipType::Proc,
    };
    let handle = sbe_boot_failure(
        &chip,
        &buf,
        &RawDataDecoder,
        &EmptyTargets,
        SeverityMerge::Worst,
    )
    .unwrap();

    let scratch = tempfile::tempdir().unwrap();
    let files = FfdcFileList::create_in(&handle, scratch.path()).unwrap();
    assert_eq!(files.len(), 2);
    let ids: Vec<u16> = files.iter().map(|f| f.log_id).collect();
    assert_eq!(ids, vec![0x10, 0x11]);
    assert_eq!(files.iter().nth(1).unwrap().severity, Severity::Unrecoverable);

    let first = files.iter().next().unwrap();
    assert_eq!(
        std::fs::read(first.path()).unwrap(),
        handle.entries()[0].attachment().unwrap()
    );

    // Dropping the list removes the files.
    let temp_paths: Vec<_> = files.iter().map(|f| f.path().to_path_buf()).collect();
    drop(files);
    assert!(temp_paths.iter().all(|p| !p.exists()));

    let out = tempfile::tempdir().unwrap();
    let files = FfdcFileList::create_in(&handle, scratch.path()).unwrap();
    let written = files.persist_all(out.path(), "chip0").unwrap();
    assert_eq!(
        written,
        vec![
            out.path().join("chip0-slid-0010.bin"),
            out.path().join("chip0-slid-0011.bin"),
        ]
    );
    assert!(written.iter().all(|p| p.exists()));
}

#[test]
fn test_handle_without_attachments_creates_no_files() {
    let mut handle = DiagnosticHandle::new();
    handle.add_entry(DiagnosticEntry::new(
        SBE_BOOT_FAILURE,
        Severity::Recovered,
        vec![(SRC6_KEY.to_string(), "0".to_string())],
        vec![],
    ));
    let scratch = tempfile::tempdir().unwrap();
    let files = FfdcFileList::create_in(&handle, scratch.path()).unwrap();
    assert!(files.is_empty());
}
