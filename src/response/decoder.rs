//! 位置数组 → 类型化结果
//!
//! 纯函数：不做 I/O，不记录日志，调用之间不保留状态。

use super::error::DecodeError;
use super::schema::{Record, EXIT, PACKAGE, PACKAGES_RESPONSE};
use super::types::{Exit, Package, PackagesResponse};
use rmpv::Value;

/// 解码 sysadmin `-o=msgpack` 输出的完整缓冲区
pub fn decode_buffer(bytes: &[u8]) -> Result<Exit, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::malformed("exit", "empty buffer"));
    }

    let mut cursor = bytes;
    let value = rmpv::decode::read_value(&mut cursor)
        .map_err(|e| DecodeError::malformed("exit", format!("invalid MessagePack: {e}")))?;
    if !cursor.is_empty() {
        return Err(DecodeError::malformed(
            "exit",
            format!("{} trailing bytes after response", cursor.len()),
        ));
    }

    decode_exit(&value)
}

pub fn decode_exit(value: &Value) -> Result<Exit, DecodeError> {
    let record = Record::open(value, &EXIT, "exit".to_string())?;

    let exit_code = record.integer(0)?;
    let exit_code = i32::try_from(exit_code).map_err(|_| {
        DecodeError::malformed(
            record.slot_path(0),
            format!("exit_code {exit_code} does not fit in i32"),
        )
    })?;

    let packages_response = record
        .opt_record(3)
        .map(|nested| packages_response_at(nested, record.slot_path(3)))
        .transpose()?;

    Ok(Exit {
        exit_code,
        real_command: record.text(1)?,
        out: record.text(2)?,
        packages_response,
        error_message: record.opt_text(4)?,
    })
}

pub fn decode_packages_response(value: &Value) -> Result<PackagesResponse, DecodeError> {
    packages_response_at(value, "packages_response".to_string())
}

pub fn decode_package(value: &Value) -> Result<Package, DecodeError> {
    package_at(value, "package".to_string())
}

fn packages_response_at(value: &Value, path: String) -> Result<PackagesResponse, DecodeError> {
    let record = Record::open(value, &PACKAGES_RESPONSE, path)?;

    Ok(PackagesResponse {
        subcommand: record.text(0)?,
        messages: record.text_list(1)?,
        packages: record.records(2, package_at)?,
        packages_size: record.opt_text(3)?,
        packages_length: record.opt_count(4)?,
        uninstalled_packages: record.records(5, package_at)?,
        uninstalled_packages_size: record.opt_text(6)?,
        uninstalled_packages_length: record.opt_count(7)?,
    })
}

fn package_at(value: &Value, path: String) -> Result<Package, DecodeError> {
    let record = Record::open(value, &PACKAGE, path)?;

    Ok(Package {
        name: record.text(0)?,
        arch: record.text(1)?,
        version: record.opt_text(2)?,
        old_version: record.opt_text(3)?,
        repository: record.opt_text(4)?,
        size: record.opt_text(5)?,
        download: record.opt_text(6)?,
        description: record.opt_text(7)?,
        url: record.opt_text(8)?,
        license: record.opt_text(9)?,
        installed: record.opt_flag(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::error::DecodeErrorKind;
    use super::*;

    fn arr(items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    fn s(text: &str) -> Value {
        Value::from(text)
    }

    fn minimal_package(name: &str) -> Value {
        arr(vec![s(name), s("x86_64")])
    }

    fn response_with(packages: Vec<Value>) -> Value {
        arr(vec![
            s("list"),
            arr(vec![]),
            arr(packages),
            Value::Nil,
            Value::Nil,
            arr(vec![]),
        ])
    }

    fn encode(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        rmpv::encode::write_value(&mut buf, value).expect("encode");
        buf
    }

    fn full_package() -> Package {
        Package {
            name: "gitui".to_string(),
            arch: "x86_64".to_string(),
            version: Some("1.2.0".to_string()),
            old_version: Some("1.1.0".to_string()),
            repository: Some("updates".to_string()),
            size: Some("10 MiB".to_string()),
            download: Some("https://mirror.example/gitui.rpm".to_string()),
            description: Some("Blazing fast terminal-ui for git".to_string()),
            url: Some("https://github.com/extrawurst/gitui".to_string()),
            license: Some("MIT".to_string()),
            installed: Some(false),
        }
    }

    #[test]
    fn package_survives_positional_round_trip() {
        let sparse = Package {
            name: "sqlite".to_string(),
            arch: "noarch".to_string(),
            version: None,
            old_version: None,
            repository: None,
            size: None,
            download: None,
            description: None,
            url: None,
            license: None,
            installed: None,
        };

        for package in [full_package(), sparse] {
            let bytes = rmp_serde::to_vec(&package).expect("serialize");
            let value = rmpv::decode::read_value(&mut bytes.as_slice()).expect("read");
            assert_eq!(value.as_array().map(Vec::len), Some(11));
            assert_eq!(decode_package(&value).expect("decode"), package);
        }
    }

    #[test]
    fn exit_without_optional_tail_decodes() {
        let exit = decode_exit(&arr(vec![Value::from(0), s("dnf"), s("ok")])).expect("decode");
        assert_eq!(exit.exit_code(), 0);
        assert_eq!(exit.real_command(), "dnf");
        assert_eq!(exit.out(), "ok");
        assert!(exit.packages_response().is_none());
        assert!(exit.error_message().is_none());
    }

    #[test]
    fn explicit_nulls_equal_absent_tail() {
        let short = decode_exit(&arr(vec![Value::from(0), s("list"), s("ok")])).expect("short");
        let padded = decode_exit(&arr(vec![
            Value::from(0),
            s("list"),
            s("ok"),
            Value::Nil,
            Value::Nil,
        ]))
        .expect("padded");
        assert_eq!(short, padded);
    }

    #[test]
    fn exit_missing_out_is_malformed() {
        let err = decode_exit(&arr(vec![Value::from(0), s("list")])).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedResponse);
        assert_eq!(err.path(), "exit");
    }

    #[test]
    fn null_required_field_is_malformed() {
        let err = decode_exit(&arr(vec![Value::from(0), Value::Nil, s("ok")])).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedResponse);
        assert_eq!(err.path(), "exit[1]");
    }

    #[test]
    fn non_array_top_level_is_malformed() {
        let err = decode_exit(&s("not a sequence")).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedResponse);
        assert!(err.reason().contains("string"));
    }

    #[test]
    fn overlong_exit_is_malformed() {
        let err = decode_exit(&arr(vec![
            Value::from(0),
            s("dnf"),
            s("ok"),
            Value::Nil,
            Value::Nil,
            s("extra"),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedResponse);
    }

    #[test]
    fn exit_code_out_of_range_is_malformed() {
        let err = decode_exit(&arr(vec![Value::from(i64::MAX), s("dnf"), s("ok")])).unwrap_err();
        assert_eq!(err.path(), "exit[0]");
    }

    #[test]
    fn packages_keep_source_order() {
        let exit = decode_exit(&arr(vec![
            Value::from(0),
            s("dnf"),
            s("ok"),
            response_with(vec![
                minimal_package("A"),
                minimal_package("B"),
                minimal_package("C"),
            ]),
        ]))
        .expect("decode");

        let names: Vec<&str> = exit
            .packages_response()
            .expect("response")
            .packages()
            .iter()
            .map(Package::name)
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn packages_length_is_not_derived_from_list() {
        let response = decode_packages_response(&arr(vec![
            s("list"),
            arr(vec![]),
            arr(vec![minimal_package("A")]),
            Value::Nil,
            Value::from(7),
            arr(vec![]),
        ]))
        .expect("decode");
        assert_eq!(response.packages().len(), 1);
        assert_eq!(response.packages_length(), Some(7));
        assert_eq!(response.uninstalled_packages_length(), None);
    }

    #[test]
    fn flat_packages_slot_is_malformed() {
        let err = decode_packages_response(&arr(vec![
            s("list"),
            arr(vec![]),
            arr(vec![s("gitui"), s("x86_64")]),
            Value::Nil,
            Value::Nil,
            arr(vec![]),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedResponse);
        assert_eq!(err.path(), "packages_response[2]");
    }

    #[test]
    fn missing_uninstalled_packages_is_malformed() {
        let err = decode_packages_response(&arr(vec![
            s("list"),
            arr(vec![]),
            arr(vec![]),
            Value::Nil,
            Value::Nil,
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedResponse);
    }

    #[test]
    fn nested_package_error_reports_full_path() {
        let err = decode_exit(&arr(vec![
            Value::from(0),
            s("dnf"),
            s("ok"),
            response_with(vec![minimal_package("A"), arr(vec![s("B")])]),
        ]))
        .unwrap_err();
        assert_eq!(err.path(), "exit[3][2][1]");
    }

    #[test]
    fn optional_slot_with_wrong_type_is_malformed() {
        let err = decode_package(&arr(vec![
            s("gitui"),
            s("x86_64"),
            Value::Nil,
            Value::Nil,
            Value::Nil,
            Value::Nil,
            Value::Nil,
            Value::Nil,
            Value::Nil,
            Value::Nil,
            s("yes"),
        ]))
        .unwrap_err();
        assert_eq!(err.path(), "package[10]");
    }

    #[test]
    fn structured_error_message_is_malformed() {
        let err = decode_exit(&arr(vec![
            Value::from(1),
            s("dnf"),
            s("Failed"),
            Value::Nil,
            arr(vec![s("nested")]),
        ]))
        .unwrap_err();
        assert_eq!(err.path(), "exit[4]");
    }

    #[test]
    fn both_outcomes_present_decode_and_are_flagged() {
        let exit = decode_exit(&arr(vec![
            Value::from(0),
            s("dnf"),
            s("ok"),
            response_with(vec![]),
            s("partial failure"),
        ]))
        .expect("decode");
        assert!(exit.has_conflicting_outcome());
        assert_eq!(exit.error_message(), Some("partial failure"));
    }

    #[test]
    fn end_to_end_list_response() {
        let value = arr(vec![
            Value::from(0),
            s("sysadmin packages list gitui"),
            s("done"),
            arr(vec![
                s("list"),
                arr(vec![s("found 1")]),
                arr(vec![arr(vec![
                    s("gitui"),
                    s("x86_64"),
                    s("1.2.0"),
                    Value::Nil,
                    s("repo1"),
                    s("10MB"),
                    s("http://x"),
                    s("desc"),
                    s("http://y"),
                    s("MIT"),
                    Value::Boolean(true),
                ])]),
                s("10MB"),
                Value::from(1),
                arr(vec![]),
                Value::Nil,
                Value::from(0),
            ]),
            Value::Nil,
        ]);

        let exit = decode_buffer(&encode(&value)).expect("decode");
        assert_eq!(exit.exit_code(), 0);
        assert!(exit.error_message().is_none());

        let response = exit.packages_response().expect("response");
        assert_eq!(response.subcommand(), "list");
        assert_eq!(response.messages(), ["found 1"]);
        assert_eq!(response.packages().len(), 1);
        assert_eq!(response.packages_size(), Some("10MB"));
        assert_eq!(response.packages_length(), Some(1));
        assert!(response.uninstalled_packages().is_empty());
        assert_eq!(response.uninstalled_packages_size(), None);
        assert_eq!(response.uninstalled_packages_length(), Some(0));

        let package = &response.packages()[0];
        assert_eq!(package.name(), "gitui");
        assert_eq!(package.version(), Some("1.2.0"));
        assert_eq!(package.old_version(), None);
        assert_eq!(package.installed(), Some(true));
        assert!(!package.has_pending_upgrade());
    }

    #[test]
    fn empty_buffer_is_malformed() {
        let err = decode_buffer(&[]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedResponse);
    }

    #[test]
    fn truncated_buffer_is_malformed() {
        let bytes = encode(&arr(vec![Value::from(0), s("dnf"), s("ok")]));
        let err = decode_buffer(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedResponse);
    }

    #[test]
    fn invalid_utf8_string_is_named_in_reason() {
        // [0, "\xff", ""]
        let err = decode_buffer(&[0x93, 0x00, 0xa1, 0xff, 0xa0]).unwrap_err();
        assert_eq!(err.path(), "exit[1]");
        assert!(err.reason().contains("invalid UTF-8 string"));
    }

    #[test]
    fn trailing_bytes_are_malformed() {
        let mut bytes = encode(&arr(vec![Value::from(0), s("dnf"), s("ok")]));
        bytes.push(0xc0);
        let err = decode_buffer(&bytes).unwrap_err();
        assert!(err.reason().contains("trailing"));
    }
}
