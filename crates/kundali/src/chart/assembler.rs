//! Runs the derivation stages for one request and merges their output.

use std::collections::BTreeMap;

use crate::chart::request::{ChartRequest, InfoLevel};
use crate::chart::response::{BhavaEntry, ChartResponse, GrahaEntry, LagnaEntry, MomentInfo};
use crate::ephemeris::Ephemeris;
use crate::error::{ChartError, EphemerisError};
use crate::timezone::{resolve_zone, Moment, ZoneLookup};
use crate::vedic::ashtakavarga::compute_ashtakavarga;
use crate::vedic::bala::{compute_graha_bala, compute_rashi_bala};
use crate::vedic::dashas::compute_vimshottari;
use crate::vedic::graha::{degree_in_rashi, Graha, LAGNA_KEY};
use crate::vedic::nakshatra::nakshatra_for_longitude;
use crate::vedic::panchanga::compute_panchanga;
use crate::vedic::state::{analyze_basic, analyze_extended, is_lagna_mrityu, GrahaState};
use crate::vedic::types::ChartData;
use crate::vedic::vargas::{build_varga, Placement, VargaChart, VargaCode};
use crate::vedic::yogas::detect_yogas;

/// Resolve the moment, observe the sky and build the chart for `request`.
pub fn assemble(
    ephemeris: &dyn Ephemeris,
    zones: &dyn ZoneLookup,
    request: &ChartRequest,
) -> Result<ChartResponse, ChartError> {
    let locality = request.locality;
    let zone = resolve_zone(
        zones,
        request.time_zone.as_deref(),
        locality.latitude,
        locality.longitude,
        request.civil,
    );
    log::debug!("Resolved zone {} ({})", zone.id, zone.offset);

    let moment = Moment::new(request.civil, zone, request.dst)?;
    assemble_at(ephemeris, moment, request)
}

/// Assemble a chart for an already resolved moment. The request's civil time
/// and zone fields are not consulted.
pub fn assemble_at(
    ephemeris: &dyn Ephemeris,
    moment: Moment,
    request: &ChartRequest,
) -> Result<ChartResponse, ChartError> {
    let chart = ChartData::observe(ephemeris, moment, request.locality)?;
    assemble_chart(&chart, request)
}

/// Build the response from an already observed chart.
pub fn assemble_chart(chart: &ChartData, request: &ChartRequest) -> Result<ChartResponse, ChartError> {
    let mut codes = vec![VargaCode::D1];
    codes.extend(request.vargas.iter().copied());
    let vargas: Vec<VargaChart> = codes.iter().map(|code| build_varga(chart, *code)).collect();
    for varga in &vargas {
        check_placements(varga)?;
    }
    log::debug!("Built {} varga charts", vargas.len());

    let graha = Graha::ALL
        .iter()
        .map(|g| (*g, graha_entry(chart, &vargas, request, *g)))
        .collect();

    let mut lagna = BTreeMap::new();
    lagna.insert(
        LAGNA_KEY,
        LagnaEntry {
            longitude: chart.ascendant,
            rashi: chart.lagna_rashi(),
            degree: degree_in_rashi(chart.ascendant),
            varga: vargas.iter().map(|v| (v.code, v.lagna)).collect(),
            nakshatra: nakshatra_for_longitude(chart.ascendant),
            mrityu: is_lagna_mrityu(chart),
        },
    );

    let bhava = (1..=12u8)
        .map(|house| {
            let rashi = chart.house_rashi(house);
            let entry = BhavaEntry {
                rashi,
                lord: chart.house_lord(house),
                grahas: chart.occupants(rashi),
            };
            (house, entry)
        })
        .collect();

    let dasha = compute_vimshottari(chart, request.nesting);

    let panchanga = request.has(InfoLevel::Panchanga).then(|| compute_panchanga(chart));

    let ashtakavarga = (request.has(InfoLevel::Ashtakavarga) || request.has(InfoLevel::Sarvashtakavarga))
        .then(|| compute_ashtakavarga(chart, request.has(InfoLevel::Sarvashtakavarga)));

    let graha_bala = (request.has(InfoLevel::Grahabala) || request.has(InfoLevel::Rashibala))
        .then(|| compute_graha_bala(chart));
    let rashibala = match (&graha_bala, request.has(InfoLevel::Rashibala)) {
        (Some(bala), true) => Some(compute_rashi_bala(chart, bala)),
        _ => None,
    };
    let grahabala = graha_bala.filter(|_| request.has(InfoLevel::Grahabala));

    let yogas = request.has(InfoLevel::Yogas).then(|| detect_yogas(chart));

    let ayanamsa = if request.has(InfoLevel::Ayanamsa) {
        Some(chart.ayanamsa.ok_or(EphemerisError::Unsupported { what: "ayanamsa" })?)
    } else {
        None
    };

    Ok(ChartResponse {
        moment: MomentInfo::from(&chart.moment),
        graha,
        lagna,
        bhava,
        dasha,
        panchanga,
        ashtakavarga,
        grahabala,
        rashibala,
        yogas,
        ayanamsa,
    })
}

fn graha_entry(chart: &ChartData, vargas: &[VargaChart], request: &ChartRequest, graha: Graha) -> GrahaEntry {
    let position = chart.position(graha);
    let state = if request.has(InfoLevel::Panchanga) {
        analyze_extended(chart, graha)
    } else if request.has(InfoLevel::Basic) {
        analyze_basic(chart, graha)
    } else {
        GrahaState::default()
    };

    GrahaEntry {
        longitude: position.longitude,
        speed: position.speed,
        declination: position.declination,
        retrograde: position.retrograde,
        rashi: chart.rashi(graha),
        degree: chart.degree(graha),
        bhava: chart.bhava(graha),
        varga: vargas.iter().map(|v| (v.code, *v.placement(graha))).collect(),
        nakshatra: nakshatra_for_longitude(position.longitude),
        state,
    }
}

fn check_placements(varga: &VargaChart) -> Result<(), ChartError> {
    let in_range = |p: &Placement| (1..=12).contains(&p.rashi) && (1..=12).contains(&p.bhava);
    if !in_range(&varga.lagna) {
        return Err(ChartError::Derivation(format!("{} lagna placed at {:?}", varga.code, varga.lagna)));
    }
    match Graha::ALL.iter().find(|g| !in_range(varga.placement(**g))) {
        Some(g) => Err(ChartError::Derivation(format!(
            "{} placement of {:?} is {:?}",
            varga.code,
            g,
            varga.placement(*g)
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::settings::ChartSettings;
    use crate::vedic::types::fixtures::chart_with;

    const DELHI: [f64; 9] = [249.2, 44.2, 235.0, 244.0, 11.4, 208.0, 310.0, 355.0, 175.0];

    fn request(info: &str, varga: &str) -> ChartRequest {
        let mut query: BTreeMap<String, String> = [
            ("latitude", "28.6139"),
            ("longitude", "77.2090"),
            ("year", "2023"),
            ("month", "12"),
            ("day", "25"),
            ("hour", "12"),
            ("min", "0"),
            ("sec", "0"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        query.insert("infolevel".into(), info.into());
        query.insert("varga".into(), varga.into());
        ChartRequest::from_query(&query, &ChartSettings::default()).unwrap()
    }

    #[test]
    fn test_only_requested_sections() {
        let chart = chart_with(328.0, DELHI);
        let response = assemble_chart(&chart, &request("basic", "D9")).unwrap();
        assert!(response.panchanga.is_none());
        assert!(response.ashtakavarga.is_none());
        assert!(response.grahabala.is_none());
        assert!(response.rashibala.is_none());
        assert!(response.yogas.is_none());
        let sun = response.graha(Graha::Sun).unwrap();
        assert_eq!(sun.varga.len(), 2);
        assert!(sun.state.astangata.is_some());
        assert!(sun.state.dispositor.is_none());
        assert_eq!(response.dasha.periods.len(), 10);
    }

    #[test]
    fn test_rashibala_keeps_grahabala_internal() {
        let chart = chart_with(328.0, DELHI);
        let response = assemble_chart(&chart, &request("rashibala,sarvashtakavarga", "D1")).unwrap();
        assert!(response.grahabala.is_none());
        assert_eq!(response.rashibala.as_ref().map(Vec::len), Some(12));
        let ashtakavarga = response.ashtakavarga.unwrap();
        assert_eq!(ashtakavarga.sarva.map(|s| s.total), Some(337));
    }

    #[test]
    fn test_ayanamsa_requires_ephemeris_support() {
        let chart = chart_with(328.0, DELHI);
        let err = assemble_chart(&chart, &request("ayanamsa", "D1")).unwrap_err();
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_bhava_and_lagna() {
        let chart = chart_with(328.0, DELHI);
        let response = assemble_chart(&chart, &request("", "D1")).unwrap();
        let lagna = response.lagna().unwrap();
        assert_eq!(lagna.rashi, 11);
        assert_eq!(response.bhava[&1].rashi, 11);
        assert_eq!(response.bhava[&1].lord, Graha::Saturn);
        assert_eq!(response.bhava[&1].grahas, vec![Graha::Saturn]);
        assert_eq!(response.bhava[&3].grahas, vec![Graha::Jupiter]);
        assert!(!lagna.mrityu);
    }

    #[test]
    fn test_lagna_mrityu_flag() {
        // Aries lagna at 0.5 degrees sits in its mrityu bhaga.
        let chart = chart_with(0.5, DELHI);
        let response = assemble_chart(&chart, &request("", "D1")).unwrap();
        assert!(response.lagna().unwrap().mrityu);
    }
}
