//! Canned WFS responses for plot-api tests.
//!
//! Every GetFeature fixture carries the same logical attributes so tests can
//! compare what the extractor produces across protocol dialects.

/// Parcel ID used by the parcel fixtures.
pub const PARCEL_ID: &str = "146501_8.0101.12";

/// Building ID used by the building fixtures.
pub const BUILDING_ID: &str = "1465010123456";

/// Warsaw city centre, WGS84.
pub const WARSAW_LON_LAT: (f64, f64) = (21.0122, 52.2297);

/// Warsaw city centre in CS92 (EPSG:2180), easting first.
pub const WARSAW_CS92: (f64, f64) = (637_382.204, 486_757.209);

/// Warsaw city centre in CS2000 zone 7 (EPSG:2178), easting first.
pub const WARSAW_CS2000_Z7: (f64, f64) = (7_500_833.512, 5_788_456.487);

/// A 20 m square anchored at [`WARSAW_CS92`], closed, as a `posList`.
pub fn warsaw_square_pos_list() -> String {
    let (e, n) = WARSAW_CS92;
    [(e, n), (e + 20.0, n), (e + 20.0, n + 20.0), (e, n + 20.0), (e, n)]
        .iter()
        .map(|(x, y)| format!("{x:.3} {y:.3}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Same square in GML 2 `coordinates` encoding.
pub fn warsaw_square_coordinates() -> String {
    warsaw_square_pos_list()
        .split_whitespace()
        .collect::<Vec<_>>()
        .chunks(2)
        .map(|pair| pair.join(","))
        .collect::<Vec<_>>()
        .join(" ")
}

/// WFS 2.0 / GML 3.2 parcel collection with one member.
pub fn wfs20_parcel_collection(parcel_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0" xmlns:gml="http://www.opengis.net/gml/3.2" xmlns:ms="http://mapserver.gis.umn.edu/mapserver" numberMatched="1" numberReturned="1">
  <wfs:member>
    <ms:dzialki gml:id="dzialki.1">
      <gml:boundedBy><gml:Envelope srsName="EPSG:2180"><gml:lowerCorner>637382 486757</gml:lowerCorner><gml:upperCorner>637402 486777</gml:upperCorner></gml:Envelope></gml:boundedBy>
      <ms:msGeometry>
        <gml:Polygon gml:id="dzialki.1.geom" srsName="EPSG:2180">
          <gml:exterior><gml:LinearRing><gml:posList srsDimension="2">{pos_list}</gml:posList></gml:LinearRing></gml:exterior>
        </gml:Polygon>
      </ms:msGeometry>
      <ms:ID_DZIALKI>{parcel_id}</ms:ID_DZIALKI>
      <ms:NUMER_DZIALKI>12</ms:NUMER_DZIALKI>
      <ms:NUMER_OBREBU>0101</ms:NUMER_OBREBU>
      <ms:POLE_EWIDENCYJNE>400</ms:POLE_EWIDENCYJNE>
    </ms:dzialki>
  </wfs:member>
</wfs:FeatureCollection>"#,
        pos_list = warsaw_square_pos_list(),
    )
}

/// WFS 1.1 / GML 3.1 parcel collection with one member.
pub fn wfs11_parcel_collection(parcel_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:ewns="http://xsd.geoportal2.pl/ewns">
  <gml:featureMember>
    <ewns:dzialki gml:id="dzialki.1">
      <ewns:geometria>
        <gml:Polygon srsName="EPSG:2180">
          <gml:exterior><gml:LinearRing><gml:posList>{pos_list}</gml:posList></gml:LinearRing></gml:exterior>
        </gml:Polygon>
      </ewns:geometria>
      <ewns:ID_DZIALKI>{parcel_id}</ewns:ID_DZIALKI>
      <ewns:NUMER_DZIALKI>12</ewns:NUMER_DZIALKI>
      <ewns:NUMER_OBREBU>0101</ewns:NUMER_OBREBU>
      <ewns:POLE_EWIDENCYJNE>400</ewns:POLE_EWIDENCYJNE>
    </ewns:dzialki>
  </gml:featureMember>
</wfs:FeatureCollection>"#,
        pos_list = warsaw_square_pos_list(),
    )
}

/// WFS 1.0 / GML 2 parcel collection with one member.
pub fn wfs10_parcel_collection(parcel_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml">
  <gml:boundedBy><gml:Box srsName="EPSG:2180"><gml:coordinates>637382,486757 637402,486777</gml:coordinates></gml:Box></gml:boundedBy>
  <gml:featureMember>
    <dzialki fid="dzialki.1">
      <the_geom>
        <gml:Polygon srsName="http://www.opengis.net/gml/srs/epsg.xml#2180">
          <gml:outerBoundaryIs><gml:LinearRing><gml:coordinates>{coordinates}</gml:coordinates></gml:LinearRing></gml:outerBoundaryIs>
        </gml:Polygon>
      </the_geom>
      <ID_DZIALKI>{parcel_id}</ID_DZIALKI>
      <NUMER_DZIALKI>12</NUMER_DZIALKI>
      <NUMER_OBREBU>0101</NUMER_OBREBU>
      <POLE_EWIDENCYJNE>400</POLE_EWIDENCYJNE>
    </dzialki>
  </gml:featureMember>
</wfs:FeatureCollection>"#,
        coordinates = warsaw_square_coordinates(),
    )
}

/// WFS 1.1 building collection: layer `budynki`, field `ID_BUDYNKU`,
/// undeclared CS92 polygon.
pub fn wfs11_building_collection(building_id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="http://www.opengis.net/gml" xmlns:ms="http://mapserver.gis.umn.edu/mapserver">
  <gml:featureMember>
    <ms:budynki gml:id="budynki.77">
      <ms:msGeometry>
        <gml:Polygon>
          <gml:exterior><gml:LinearRing><gml:posList>{pos_list}</gml:posList></gml:LinearRing></gml:exterior>
        </gml:Polygon>
      </ms:msGeometry>
      <ms:ID_BUDYNKU>{building_id}</ms:ID_BUDYNKU>
      <ms:FUNKCJA>mieszkalny</ms:FUNKCJA>
      <ms:KONDYGNACJE>4</ms:KONDYGNACJE>
    </ms:budynki>
  </gml:featureMember>
</wfs:FeatureCollection>"#,
        pos_list = warsaw_square_pos_list(),
    )
}

/// WFS 2.0 collection with no members.
pub const EMPTY_COLLECTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0" numberMatched="0" numberReturned="0"/>"#;

/// OWS exception report as sent by WFS 1.1 and 2.0 servers.
pub const OWS_EXCEPTION_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ows:ExceptionReport xmlns:ows="http://www.opengis.net/ows/1.1" version="2.0.0">
  <ows:Exception exceptionCode="InvalidParameterValue" locator="FILTER">
    <ows:ExceptionText>Filter parsing failed</ows:ExceptionText>
  </ows:Exception>
</ows:ExceptionReport>"#;

/// WFS 1.0 service exception report.
pub const WFS10_SERVICE_EXCEPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ServiceExceptionReport version="1.2.0">
  <ServiceException code="InvalidParameterValue">msWFSGetFeature(): WFS server error. TYPENAME 'dzialki' doesn't exist</ServiceException>
</ServiceExceptionReport>"#;

/// Header line of a registry file.
pub const REGISTRY_HEADER: &str = "id;organizacja;teryt;url";
