use anyhow::Result;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::license::normalize::normalize;
use crate::models::{DeclaredLicense, PackageLicenseInfo};

/// Pull license metadata out of one nuspec document.
///
/// The `<license>` element wins over the legacy `<licenseUrl>`, whichever
/// order they appear in:
/// - `<license type="file">X</license>` → [`DeclaredLicense::File`], verbatim
/// - `<license type="expression">X</license>` → [`DeclaredLicense::Expression`]
/// - no `<license>`, but `<licenseUrl>U</licenseUrl>` → [`DeclaredLicense::Url`]
/// - neither → [`DeclaredLicense::Unknown`]
///
/// `<projectUrl>` is normalized whenever present. Malformed XML yields the
/// default (empty) info; the caller treats such a package as carrying no
/// declared license.
pub fn extract_license_info(manifest_xml: &str) -> PackageLicenseInfo {
    parse(manifest_xml).unwrap_or_default()
}

enum Field {
    License,
    LicenseUrl,
    ProjectUrl,
}

fn parse(xml: &str) -> Result<PackageLicenseInfo> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut license_type: Option<String> = None;
    let mut license_value: Option<String> = None;
    let mut license_url: Option<String> = None;
    let mut project_url: Option<String> = None;

    let mut current: Option<Field> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                current = match tag.as_str() {
                    "license" => {
                        for attr in e.attributes().flatten() {
                            let key =
                                String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                            if key == "type" {
                                license_type =
                                    Some(attr.unescape_value().unwrap_or_default().into_owned());
                            }
                        }
                        Some(Field::License)
                    }
                    "licenseUrl" => Some(Field::LicenseUrl),
                    "projectUrl" => Some(Field::ProjectUrl),
                    _ => None,
                };
            }
            Ok(Event::Text(ref t)) => {
                let text = t.unescape()?.into_owned();
                match current {
                    Some(Field::License) => license_value = Some(text),
                    Some(Field::LicenseUrl) => license_url = Some(text),
                    Some(Field::ProjectUrl) => project_url = Some(text),
                    None => {}
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    let license = match (license_type.as_deref(), license_value) {
        (Some(t), Some(value)) if t.eq_ignore_ascii_case("file") => DeclaredLicense::File(value),
        (_, Some(value)) => DeclaredLicense::Expression(value),
        (_, None) => match license_url {
            Some(url) => DeclaredLicense::Url(url),
            None => DeclaredLicense::Unknown,
        },
    };

    Ok(PackageLicenseInfo {
        license,
        project_url: project_url.map(|u| normalize(&u)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nuspec(metadata: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>TestPackage</id>
    <version>1.0.0</version>
    {metadata}
  </metadata>
</package>"#
        )
    }

    #[test]
    fn test_file_type_extracted_verbatim() {
        let info = extract_license_info(&nuspec(r#"<license type="file">LICENSE.md</license>"#));
        assert_eq!(info.license, DeclaredLicense::File("LICENSE.md".to_string()));
        assert_eq!(info.license.as_policy_token(), "LICENSE.md");
    }

    #[test]
    fn test_file_type_wins_over_license_url() {
        let info = extract_license_info(&nuspec(
            r#"<license type="file">LICENSE.md</license>
    <licenseUrl>https://aka.ms/deprecateLicenseUrl</licenseUrl>"#,
        ));
        assert_eq!(info.license, DeclaredLicense::File("LICENSE.md".to_string()));
    }

    #[test]
    fn test_expression_type_extracted_verbatim() {
        let info =
            extract_license_info(&nuspec(r#"<license type="expression">MIT</license>"#));
        assert_eq!(info.license, DeclaredLicense::Expression("MIT".to_string()));
        assert_eq!(info.license.as_policy_token(), "MIT");
    }

    #[test]
    fn test_expression_wins_over_license_url() {
        let info = extract_license_info(&nuspec(
            r#"<licenseUrl>https://example.org/custom</licenseUrl>
    <license type="expression">Apache-2.0</license>"#,
        ));
        assert_eq!(
            info.license,
            DeclaredLicense::Expression("Apache-2.0".to_string())
        );
    }

    #[test]
    fn test_fallback_url_recognized_as_spdx_token() {
        let info = extract_license_info(&nuspec(
            r#"<licenseUrl>https://opensource.org/licenses/MIT</licenseUrl>"#,
        ));
        assert_eq!(info.license.as_policy_token(), "MIT");
    }

    #[test]
    fn test_fallback_url_unrecognized_is_normalized() {
        let info = extract_license_info(&nuspec(
            r#"<licenseUrl>https://aka.ms/deprecateLicenseUrl</licenseUrl>"#,
        ));
        assert_eq!(
            info.license,
            DeclaredLicense::Url("https://aka.ms/deprecateLicenseUrl".to_string())
        );
        assert_eq!(info.license.as_policy_token(), "aka.ms/deprecateLicenseUrl");
    }

    #[test]
    fn test_no_license_metadata_at_all() {
        let info = extract_license_info(&nuspec(""));
        assert_eq!(info.license, DeclaredLicense::Unknown);
        assert_eq!(info.license.as_policy_token(), "");
    }

    #[test]
    fn test_project_url_is_normalized() {
        let info = extract_license_info(&nuspec(
            r#"<license type="expression">MIT</license>
    <projectUrl>https://github.com/example/project</projectUrl>"#,
        ));
        assert_eq!(
            info.project_url.as_deref(),
            Some("github.com/example/project")
        );
    }

    #[test]
    fn test_project_url_normalized_on_every_branch() {
        let info = extract_license_info(&nuspec(
            r#"<licenseUrl>https://example.org/custom</licenseUrl>
    <projectUrl>http://example.org/home</projectUrl>"#,
        ));
        assert_eq!(info.project_url.as_deref(), Some("example.org/home"));
    }

    #[test]
    fn test_malformed_xml_yields_empty_info() {
        let info = extract_license_info("<package><metadata><license type=");
        assert_eq!(info, PackageLicenseInfo::default());
    }

    #[test]
    fn test_untyped_license_element_treated_as_expression() {
        let info = extract_license_info(&nuspec(r#"<license>MIT</license>"#));
        assert_eq!(info.license, DeclaredLicense::Expression("MIT".to_string()));
    }
}
