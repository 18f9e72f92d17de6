#[cfg(test)]
mod test {
    use crate::epoch::to_week_seconds;
    use crate::prelude::*;
    use crate::tests::toolkit::{mixed_store, test_resource};

    use std::str::FromStr;

    fn mixed_content() -> String {
        std::fs::read_to_string(test_resource("NAV/V3/MIXED.rnx")).unwrap()
    }

    /// Replaces one line (counted from 1) of the content
    fn replace_line(content: &str, line_number: usize, new_line: &str) -> String {
        content
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i + 1 == line_number {
                    new_line.to_string()
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn v3_mixed() {
        let store = mixed_store();
        assert!(store.is_ready());
        assert_eq!(store.len(), 9);

        let svs = store.sv_iter().collect::<Vec<_>>();
        assert_eq!(svs.len(), 7);
        for sv in ["G01", "G30", "E01", "C01", "C06", "J01", "R01"] {
            let sv = SV::from_str(sv).unwrap();
            assert!(svs.contains(&sv), "missing {}", sv);
        }

        // SBAS and IRNSS frames are skipped
        for sv in svs.iter() {
            assert!(!sv.constellation.is_sbas());
            assert_ne!(sv.constellation, Constellation::IRNSS);
        }

        let headers = store.headers();
        assert_eq!(headers.len(), 1);
        let header = &headers[0];
        assert_eq!(header.version, Version::new(3, 4));
        assert_eq!(header.constellation, Some(Constellation::Mixed));
        assert_eq!(header.program.as_deref(), Some("rinex-brdc"));
        assert_eq!(header.comments, vec!["Synthetic broadcast ephemerides"]);
        assert_eq!(header.time_corrections.len(), 2);
        assert_eq!(header.time_corrections[0].kind, "GPUT");
        assert_eq!(header.time_corrections[0].a0, -3.7252902985E-09);
        assert_eq!(header.time_corrections[0].t_ref, 233472);
        assert_eq!(header.leap.map(|leap| leap.leap), Some(18));

        let kb = header.ionosphere[&Constellation::BeiDou]
            .as_klobuchar()
            .unwrap();
        assert_eq!(kb.alpha, (1.1176E-08, 2.9802E-08, -4.1723E-07, 6.5565E-07));
        assert_eq!(kb.beta, (1.4131E+05, -5.2429E+05, 1.6515E+06, -4.5220E+05));
        assert!(header.ionosphere[&Constellation::Galileo]
            .as_nequick_g()
            .is_some());
    }

    #[test]
    fn v3_gps_frame() {
        let store = mixed_store();
        let g01 = SV::from_str("G01").unwrap();

        let ephemerides = store.ephemerides(g01).collect::<Vec<_>>();
        assert_eq!(ephemerides.len(), 2);

        let eph = ephemerides[0].as_kepler().unwrap();
        let toc = Epoch::from_gregorian(2020, 6, 25, 0, 0, 0, 0, TimeScale::GPST);
        assert_eq!(eph.toc, toc);
        assert_eq!(eph.toe, toc);
        assert_eq!(eph.week, 2111);
        assert_eq!(eph.toe_sow, 345600.0);
        assert_eq!(eph.tx_tow, 338400.0);
        assert_eq!(eph.clock_bias, -3.460352309048E-04);
        assert_eq!(eph.clock_drift, -6.366462912410E-12);
        assert_eq!(eph.clock_drift_rate, 0.0);
        assert_eq!(eph.iode, 64.0);
        assert_eq!(eph.kepler.sqrt_a, 5.153652618408E+03);
        assert_eq!(eph.kepler.e, 8.618216658942E-03);
        assert_eq!(eph.kepler.i_0, 9.748900532350E-01);
        assert_eq!(eph.kepler.omega_0, -1.145372453127E+00);
        assert_eq!(eph.kepler.omega, 6.794935073927E-01);
        assert_eq!(eph.kepler.m_0, 2.134532913542E+00);
        assert_eq!(eph.perturbations.crs, 1.987500000000E+01);
        assert_eq!(eph.perturbations.crc, 2.723750000000E+02);
        assert_eq!(eph.perturbations.omega_dot, -8.289987896235E-09);
        assert_eq!(eph.perturbations.i_dot, -1.117903137396E-10);
        assert_eq!(eph.health, 0.0);
        assert_eq!(
            eph.system,
            SystemSpecific::Gps {
                l2_codes: 1.0,
                l2p_flag: 0.0,
                tgd: -5.587935447693E-09,
                iodc: 64.0,
                fit_interval: 4.0,
            }
        );

        // sorted by toe
        let second = ephemerides[1].as_kepler().unwrap();
        assert_eq!(
            second.toe,
            Epoch::from_gregorian(2020, 6, 25, 2, 0, 0, 0, TimeScale::GPST)
        );
    }

    #[test]
    fn v3_other_frames() {
        let store = mixed_store();

        let e01 = SV::from_str("E01").unwrap();
        let eph = store.ephemerides(e01).next().unwrap().as_kepler().unwrap();
        assert_eq!(eph.toc.time_scale, TimeScale::GST);
        assert_eq!(eph.week, 2111);
        assert_eq!(to_week_seconds(eph.toe, TimeScale::GST), (1087, 345600.0));
        assert_eq!(
            eph.system,
            SystemSpecific::Galileo {
                data_sources: 516.0,
                bgd_e5a_e1: -2.095475792885E-09,
                bgd_e5b_e1: -2.328306436539E-09,
            }
        );

        let c01 = SV::from_str("C01").unwrap();
        let eph = store.ephemerides(c01).next().unwrap().as_kepler().unwrap();
        let toc = Epoch::from_gregorian(2020, 6, 25, 0, 0, 0, 0, TimeScale::BDT);
        assert_eq!(eph.toc, toc);
        assert_eq!(eph.toe, toc);
        assert_eq!(eph.week, 755);
        assert!(matches!(eph.system, SystemSpecific::BeiDou { aodc, .. } if aodc == 1.0));

        let j01 = SV::from_str("J01").unwrap();
        let eph = store.ephemerides(j01).next().unwrap().as_kepler().unwrap();
        assert_eq!(eph.toc.time_scale, TimeScale::QZSST);
        assert_eq!(eph.fit_half_width(), 7200.0);

        let r01 = SV::from_str("R01").unwrap();
        let ephemerides = store.ephemerides(r01).collect::<Vec<_>>();
        assert_eq!(ephemerides.len(), 2);
        let eph = ephemerides[0].as_glonass().unwrap();
        assert_eq!(eph.epoch, Epoch::from_gregorian_utc(2020, 6, 25, 0, 15, 0, 0));
        assert_eq!(eph.clock_bias, 7.282570004460E-05);
        assert_eq!(eph.frame_time, 3.420000000000E+05);
        assert_eq!(eph.channel, 1);
        assert_eq!(
            eph.acceleration,
            nalgebra::Vector3::new(
                -9.313225746155E-10,
                -1.862645149231E-09,
                -2.793967723846E-09
            )
        );
        assert!(eph.status.is_none());
    }

    #[test]
    fn v305_glonass() {
        let store =
            EphemerisStore::from_file(test_resource("NAV/V3/GLONASS305.rnx")).unwrap();
        assert_eq!(store.len(), 2);

        let header = &store.headers()[0];
        assert_eq!(header.version, Version::new(3, 5));
        assert_eq!(header.constellation, Some(Constellation::Glonass));
        assert_eq!(header.time_corrections[0].kind, "GLUT");

        let r02 = SV::from_str("R02").unwrap();
        let eph = store.ephemerides(r02).next().unwrap().as_glonass().unwrap();
        assert_eq!(eph.channel, -4);
        assert_eq!(eph.gamma, 9.094947017729E-13);
        let status = eph.status.unwrap();
        assert_eq!(status.status_flags, 179.0);
        assert_eq!(status.group_delay, 1.862645149231E-09);
    }

    #[test]
    fn v2_gps() {
        let store = EphemerisStore::from_file(test_resource("NAV/V2/GPS.21n")).unwrap();
        assert_eq!(store.len(), 2);

        let header = &store.headers()[0];
        assert_eq!(header.version, Version::new(2, 10));
        assert_eq!(header.constellation, Some(Constellation::GPS));
        assert_eq!(header.program.as_deref(), Some("CCRINEXN V1.6.0 UX"));
        assert_eq!(header.time_corrections[0].kind, "GPUT");
        assert_eq!(header.time_corrections[0].week, 2149);

        let kb = header.ionosphere[&Constellation::GPS].as_klobuchar().unwrap();
        assert_eq!(kb.alpha, (0.1676E-07, 0.2235E-07, -0.1192E-06, -0.1192E-06));

        let g02 = SV::new(Constellation::GPS, 2);
        let eph = store.ephemerides(g02).next().unwrap().as_kepler().unwrap();
        let toc = Epoch::from_gregorian(2021, 3, 14, 0, 0, 0, 0, TimeScale::GPST);
        assert_eq!(eph.toc, toc);
        assert_eq!(eph.toe, toc);
        assert_eq!(eph.week, 2149);
        assert_eq!(eph.tx_tow, -7200.0);
        assert_eq!(eph.clock_bias, -1.654908806086E-04);
        assert_eq!(eph.kepler.sqrt_a, 5.153700279236E+03);
    }

    #[test]
    fn v2_glonass() {
        let store = EphemerisStore::from_file(test_resource("NAV/V2/GLONASS.20g")).unwrap();
        assert_eq!(store.len(), 1);

        let header = &store.headers()[0];
        assert_eq!(header.version, Version::new(2, 11));
        assert_eq!(header.constellation, Some(Constellation::Glonass));
        assert_eq!(header.time_corrections[0].kind, "GLUT");

        let r01 = SV::new(Constellation::Glonass, 1);
        let eph = store.ephemerides(r01).next().unwrap().as_glonass().unwrap();
        assert_eq!(eph.epoch, Epoch::from_gregorian_utc(2020, 12, 31, 23, 45, 0, 0));
        assert_eq!(eph.clock_bias, 7.282570004460E-05);
        assert_eq!(eph.frame_time, 7.380000000000E+04);
        assert_eq!(eph.position[0], 1.586724526308E+04);
        assert_eq!(eph.velocity[2], 3.417060170486E+00);
        assert_eq!(eph.channel, 1);
    }

    #[test]
    fn unknown_header_label() {
        let content = replace_line(
            &mixed_content(),
            3,
            &format!("{:<60}COMMENTS", "Synthetic broadcast ephemerides"),
        );
        let mut store = EphemerisStore::new();
        match store.ingest(content.as_bytes()) {
            Err(Error::Parsing {
                line_number, kind, ..
            }) => {
                assert_eq!(line_number, 3);
                assert_eq!(kind, ParsingError::UnknownHeaderLabel("COMMENTS".to_string()));
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn short_line() {
        let content = replace_line(
            &mixed_content(),
            14,
            "     6.400000000000E+01 1.987500000000E+01",
        );
        let mut store = EphemerisStore::new();
        match store.ingest(content.as_bytes()) {
            Err(Error::Parsing {
                line_number,
                line,
                kind,
            }) => {
                assert_eq!(line_number, 14);
                assert_eq!(line, "     6.400000000000E+01 1.987500000000E+01");
                assert_eq!(
                    kind,
                    ParsingError::LineTooShort {
                        expected: 80,
                        found: 42
                    }
                );
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn multibyte_field() {
        // same byte length, but a field limit falls within 'é'
        let line = "     6.400000000000E+0é1.987500000000E+01 4.611977524497E-09 2.134532913542E+00";
        let content = replace_line(&mixed_content(), 14, line);
        let mut store = EphemerisStore::new();
        match store.ingest(content.as_bytes()) {
            Err(Error::Parsing {
                line_number, kind, ..
            }) => {
                assert_eq!(line_number, 14);
                assert_eq!(kind, ParsingError::CharBoundary(23));
            },
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(store.is_empty());
        assert!(!store.is_ready());
    }

    #[test]
    fn multibyte_leap_seconds() {
        let content = replace_line(
            &mixed_content(),
            11,
            &format!("{:<60}LEAP SECONDS", "    18    18  2185     €"),
        );
        let mut store = EphemerisStore::new();
        match store.ingest(content.as_bytes()) {
            Err(Error::Parsing {
                line_number, kind, ..
            }) => {
                assert_eq!(line_number, 11);
                assert_eq!(
                    kind,
                    ParsingError::LeapSecond(crate::leap::ParsingError::CharBoundary(24))
                );
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn blank_line_within_frame() {
        let content = mixed_content();
        let mut lines = content.lines().collect::<Vec<_>>();
        lines.insert(14, "");
        let content = lines.join("\n");

        let mut store = EphemerisStore::new();
        match store.ingest(content.as_bytes()) {
            Err(Error::Parsing {
                line_number,
                line,
                kind,
            }) => {
                assert_eq!(line_number, 15);
                assert!(line.is_empty());
                assert_eq!(
                    kind,
                    ParsingError::LineTooShort {
                        expected: 80,
                        found: 0
                    }
                );
            },
            other => panic!("unexpected result: {:?}", other),
        }

        // between frames, blank lines are tolerated
        let mut lines = content.lines().collect::<Vec<_>>();
        lines.remove(14);
        lines.insert(20, "");
        let content = lines.join("\n");
        let mut store = EphemerisStore::new();
        assert!(store.ingest(content.as_bytes()).is_ok());
        assert_eq!(store.len(), 9);
    }

    #[test]
    fn invalid_float() {
        let content = replace_line(
            &mixed_content(),
            15,
            "     1.14589929.807E-06 8.618216658942E-03 5.709007382393E-06 5.153652618408E+03",
        );
        let mut store = EphemerisStore::new();
        match store.ingest(content.as_bytes()) {
            Err(Error::Parsing {
                line_number, kind, ..
            }) => {
                assert_eq!(line_number, 15);
                assert_eq!(kind, ParsingError::Float("1.14589929.807E-06".to_string()));
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn truncated_frame() {
        let content = mixed_content();
        let lines = content.lines().collect::<Vec<_>>();
        let truncated = lines[..lines.len() - 3].join("\n");

        let mut store = EphemerisStore::new();
        match store.ingest(truncated.as_bytes()) {
            Err(Error::Parsing {
                line_number, kind, ..
            }) => {
                assert_eq!(line_number, lines.len() - 3);
                assert_eq!(kind, ParsingError::TruncatedBlock(3));
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unsupported_version() {
        let content = replace_line(
            &mixed_content(),
            1,
            "     4.00           N: GNSS NAV DATA    M: MIXED            RINEX VERSION / TYPE",
        );
        let mut store = EphemerisStore::new();
        assert!(matches!(
            store.ingest(content.as_bytes()),
            Err(Error::Parsing {
                line_number: 1,
                kind: ParsingError::Version(_),
                ..
            })
        ));
    }

    #[test]
    fn atomic_ingestion() {
        let mut store = mixed_store();
        let len = store.len();

        // valid frames come first, the error is located at the very end
        let content = mixed_content();
        let lines = content.lines().collect::<Vec<_>>();
        let truncated = lines[..lines.len() - 1].join("\n");

        assert!(store.ingest(truncated.as_bytes()).is_err());
        assert_eq!(store.len(), len);
        assert_eq!(store.headers().len(), 1);

        // a valid file accumulates
        assert!(store.ingest(content.as_bytes()).is_ok());
        assert_eq!(store.len(), 2 * len);
        assert_eq!(store.headers().len(), 2);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            EphemerisStore::from_file(test_resource("NAV/V3/NOT-A-FILE.rnx")),
            Err(Error::Io(_))
        ));
    }
}
