//! Fixed parts of a PresentationML package and the builders for the
//! parts that depend on the slide count.

use deck_core::Canvas;
use quick_xml::escape::escape;

pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Application name recorded in `docProps/app.xml`.
const APPLICATION: &str = "html2pptx";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Relationship ids in `ppt/_rels/presentation.xml.rels`. Slides follow.
const PRESENTATION_FIXED_RELS: usize = 3;

pub const PRESENTATION_PATH: &str = "ppt/presentation.xml";
pub const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Archive path of the n-th slide (1-based).
pub fn slide_path(number: usize) -> String {
    format!("ppt/slides/slide{}.xml", number)
}

/// Archive path of the n-th slide's relationships (1-based).
pub fn slide_rels_path(number: usize) -> String {
    format!("ppt/slides/_rels/slide{}.xml.rels", number)
}

pub fn content_types(slide_count: usize) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    for n in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/{}" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            slide_path(n)
        ));
    }
    xml.push_str("</Types>");
    xml
}

pub fn root_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{REL_BASE}/extended-properties" Target="docProps/app.xml"/></Relationships>"#
    )
}

pub fn core_properties(title: Option<&str>) -> String {
    let title = title
        .map(|t| format!("<dc:title>{}</dc:title>", escape(t)))
        .unwrap_or_default();
    format!(
        r#"{XML_DECL}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">{title}<cp:revision>1</cp:revision></cp:coreProperties>"#
    )
}

pub fn app_properties(slide_count: usize) -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>{APPLICATION}</Application><PresentationFormat>On-screen Show (16:9)</PresentationFormat><Slides>{slide_count}</Slides></Properties>"#,
    )
}

/// Relationship id of the n-th slide (1-based) in the presentation rels.
pub fn slide_rel_id(number: usize) -> String {
    format!("rId{}", PRESENTATION_FIXED_RELS + number)
}

pub fn presentation(canvas: &Canvas, slide_count: usize) -> String {
    let slide_ids = if slide_count == 0 {
        String::new()
    } else {
        let ids: String = (1..=slide_count)
            .map(|n| format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 255 + n, slide_rel_id(n)))
            .collect();
        format!("<p:sldIdLst>{}</p:sldIdLst>", ids)
    };
    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{slide_ids}<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        canvas.width, canvas.height
    )
}

pub fn presentation_rels(slide_count: usize) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="slideMasters/slideMaster1.xml"/><Relationship Id="rId2" Type="{REL_BASE}/theme" Target="theme/theme1.xml"/><Relationship Id="rId3" Type="{REL_BASE}/presProps" Target="presProps.xml"/>"#
    );
    for n in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{REL_BASE}/slide" Target="slides/slide{}.xml"/>"#,
            slide_rel_id(n),
            n
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn slide_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#
    )
}

pub fn pres_props() -> String {
    format!(r#"{XML_DECL}<p:presentationPr xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"/>"#)
}

/// Empty group shape properties opening every shape tree.
const GROUP_SHAPE_HEADER: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

pub fn slide_master() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{GROUP_SHAPE_HEADER}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst><p:txStyles><p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle><p:bodyStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:bodyStyle><p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle></p:txStyles></p:sldMaster>"#
    )
}

pub fn slide_master_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="{REL_BASE}/theme" Target="../theme/theme1.xml"/></Relationships>"#
    )
}

/// The blank layout every slide is based on.
pub fn blank_layout() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{GROUP_SHAPE_HEADER}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

pub fn blank_layout_rels() -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_BASE}/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#
    )
}

pub fn theme() -> String {
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let fills = solid.repeat(3);
    let lines = format!(r#"<a:ln w="9525">{solid}</a:ln>"#).repeat(3);
    let effects = "<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3);
    let font = r#"<a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/>"#;
    format!(
        r#"{XML_DECL}<a:theme xmlns:a="{NS_A}" name="Office Theme"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2><a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2><a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4><a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6><a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont>{font}</a:majorFont><a:minorFont>{font}</a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{lines}</a:lnStyleLst><a:effectStyleLst>{effects}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_lists_slides_and_size() {
        let xml = presentation(&Canvas::widescreen(), 2);
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId4"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId5"/>"#));
    }

    #[test]
    fn test_empty_presentation_has_no_slide_list() {
        let xml = presentation(&Canvas::widescreen(), 0);
        assert!(!xml.contains("sldIdLst"));
        assert!(!presentation_rels(0).contains("slides/"));
    }

    #[test]
    fn test_content_types_cover_slides() {
        let xml = content_types(3);
        assert!(xml.contains(r#"PartName="/ppt/slides/slide3.xml""#));
        assert!(!xml.contains("slide4.xml"));
    }

    #[test]
    fn test_core_properties_escape_title() {
        let xml = core_properties(Some("Q&A <final>"));
        assert!(xml.contains("<dc:title>Q&amp;A &lt;final&gt;</dc:title>"));
        assert!(!core_properties(None).contains("dc:title"));
    }

    #[test]
    fn test_slide_rel_ids_follow_fixed_parts() {
        assert_eq!(slide_rel_id(1), "rId4");
        assert!(presentation_rels(1)
            .contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml""#));
    }
}
