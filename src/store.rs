//! Ephemeris store: NAV ingestion, indexing and point queries
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use log::{debug, info};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

use crate::{
    cfg::Config,
    epoch::native_timescale,
    header::{Header, HeaderState},
    navigation::{formatting::write_frame, parsing::PendingBlock, Ephemeris, Xvt},
    prelude::{Constellation, Epoch, Error, ParsingError, Version, SV},
};

/// Locates a [ParsingError]
fn parsing_error(line_number: usize, line: &str, kind: ParsingError) -> Error {
    Error::Parsing {
        line_number,
        line: line.to_string(),
        kind,
    }
}

/// One stored [Ephemeris], tagged with its insertion rank
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    rank: usize,
    ephemeris: Ephemeris,
}

/// [EphemerisStore] gathers broadcast ephemerides, indexed per satellite
/// and sorted by reference epoch, and resolves satellite states at any
/// requested instant.
///
/// Ingestion requires exclusive access, queries only need a shared reference:
/// once loaded, the store may be shared between threads.
///
/// ```
/// use rinex_brdc::prelude::*;
///
/// let store = EphemerisStore::from_file("test_resources/NAV/V3/MIXED.rnx")
///     .unwrap();
///
/// let g01 = SV::new(Constellation::GPS, 1);
/// let t = Epoch::from_gregorian(2020, 6, 25, 1, 0, 0, 0, TimeScale::GPST);
///
/// let xvt = store.xvt(g01, t)
///     .unwrap();
///
/// assert!(xvt.radius() > 20_000_000.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EphemerisStore {
    cfg: Config,
    headers: Vec<Header>,
    ephemerides: BTreeMap<SV, Vec<Entry>>,
    rank: usize,
    ready: bool,
}

impl EphemerisStore {
    /// Builds an empty [EphemerisStore] with default [Config]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an empty [EphemerisStore] with custom [Config]
    pub fn with_config(cfg: Config) -> Self {
        Self {
            cfg,
            ..Default::default()
        }
    }

    /// Returns the [Config] in use
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Builds [EphemerisStore] from a local NAV file, with default [Config].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut store = Self::new();
        store.ingest_file(path)?;
        Ok(store)
    }

    /// Builds [EphemerisStore] from a local gzip compressed NAV file,
    /// with default [Config].
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let mut store = Self::new();
        store.ingest_gzip_file(path)?;
        Ok(store)
    }

    /// Ingests a local NAV file
    pub fn ingest_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let fd = File::open(path)?;
        self.ingest(BufReader::new(fd))
    }

    /// Ingests a local gzip compressed NAV file
    #[cfg(feature = "flate2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
    pub fn ingest_gzip_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let fd = File::open(path)?;
        self.ingest(BufReader::new(GzDecoder::new(fd)))
    }

    /// Ingests NAV content (header then frames). Ingestion is atomic:
    /// on any error the store is left untouched.
    /// SBAS and IRNSS frames are skipped.
    pub fn ingest<R: BufRead>(&mut self, reader: R) -> Result<(), Error> {
        let mut header = Header::default();
        let mut header_done = false;

        let mut pending = Option::<PendingBlock>::None;
        let mut parsed = Vec::<Ephemeris>::new();
        let mut skipped = 0;

        let mut line_number = 0;
        let mut last_line = String::new();

        for line in reader.lines() {
            let line = line?;
            line_number += 1;

            if !header_done {
                match header.parse_line(&line) {
                    Ok(HeaderState::Done) => header_done = true,
                    Ok(HeaderState::Pending) => {},
                    Err(kind) => return Err(parsing_error(line_number, &line, kind)),
                }
                last_line = line;
                continue;
            }

            // blank lines may only separate frames
            if pending.is_none() && line.trim().is_empty() {
                continue;
            }

            match pending.as_mut() {
                Some(block) => block
                    .push(&line)
                    .map_err(|kind| parsing_error(line_number, &line, kind))?,
                None => {
                    let block = PendingBlock::new(&line, header.version, header.constellation)
                        .map_err(|kind| parsing_error(line_number, &line, kind))?;
                    pending = Some(block);
                },
            }

            if pending.as_ref().map_or(false, |block| block.is_complete()) {
                if let Some(block) = pending.take() {
                    match Ephemeris::from_block(&block)
                        .map_err(|kind| parsing_error(line_number, &line, kind))?
                    {
                        Some(ephemeris) => parsed.push(ephemeris),
                        None => {
                            debug!("{}({}): unsupported frame skipped", block.epoch, block.sv);
                            skipped += 1;
                        },
                    }
                }
            }

            last_line = line;
        }

        if !header_done {
            return Err(parsing_error(
                line_number,
                &last_line,
                ParsingError::MissingHeaderTerminator,
            ));
        }

        if let Some(block) = pending {
            return Err(parsing_error(
                line_number,
                &last_line,
                ParsingError::TruncatedBlock(block.missing()),
            ));
        }

        info!(
            "NAV V{}: {} ephemerides ingested ({} skipped)",
            header.version,
            parsed.len(),
            skipped
        );

        for ephemeris in parsed {
            self.index(ephemeris);
        }

        self.headers.push(header);
        self.ready = true;
        Ok(())
    }

    /// Indexes one [Ephemeris], keeping each series sorted by toe.
    /// Equal toes are kept in insertion order.
    fn index(&mut self, ephemeris: Ephemeris) {
        let toe = ephemeris.toe();
        let entries = self.ephemerides.entry(ephemeris.sv()).or_default();
        let position = entries.partition_point(|entry| entry.ephemeris.toe() <= toe);
        entries.insert(
            position,
            Entry {
                rank: self.rank,
                ephemeris,
            },
        );
        self.rank += 1;
    }

    /// Inserts one [Ephemeris] manually. The store becomes ready for queries.
    pub fn insert(&mut self, ephemeris: Ephemeris) {
        self.index(ephemeris);
        self.ready = true;
    }

    /// Removes all ephemerides of this [SV], returning them in toe order
    pub fn remove_sv(&mut self, sv: SV) -> Option<Vec<Ephemeris>> {
        self.ephemerides
            .remove(&sv)
            .map(|entries| entries.into_iter().map(|entry| entry.ephemeris).collect())
    }

    /// Retains only the ephemerides that match the predicate
    pub fn retain<F: FnMut(&Ephemeris) -> bool>(&mut self, mut f: F) {
        for entries in self.ephemerides.values_mut() {
            entries.retain(|entry| f(&entry.ephemeris));
        }
        self.ephemerides.retain(|_, entries| !entries.is_empty());
    }

    /// Resets this store, which is not ready for queries anymore
    pub fn clear(&mut self) {
        self.headers.clear();
        self.ephemerides.clear();
        self.rank = 0;
        self.ready = false;
    }

    /// True once an ingestion or insertion completed
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Headers of all ingested files, in ingestion order
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Iterates over the satellites present in this store
    pub fn sv_iter(&self) -> impl Iterator<Item = SV> + '_ {
        self.ephemerides.keys().copied()
    }

    /// Iterates over the ephemerides of this [SV], in toe order
    pub fn ephemerides(&self, sv: SV) -> impl Iterator<Item = &Ephemeris> + '_ {
        self.ephemerides
            .get(&sv)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|entry| &entry.ephemeris))
    }

    /// Iterates over all ephemerides, per satellite then in toe order
    pub fn ephemerides_iter(&self) -> impl Iterator<Item = &Ephemeris> + '_ {
        self.ephemerides
            .values()
            .flat_map(|entries| entries.iter().map(|entry| &entry.ephemeris))
    }

    /// Total number of ephemerides
    pub fn len(&self) -> usize {
        self.ephemerides.values().map(|entries| entries.len()).sum()
    }

    /// True if this store does not contain any ephemeris
    pub fn is_empty(&self) -> bool {
        self.ephemerides.is_empty()
    }

    /// Selects the [Ephemeris] to use for this [SV] at `t`: the nearest one
    /// whose reference epoch lies within the selection window. Ties are
    /// resolved towards the most recently ingested one.
    pub fn select(&self, sv: SV, t: Epoch) -> Result<&Ephemeris, Error> {
        if !self.ready {
            return Err(Error::NotReady);
        }

        let ts = native_timescale(sv.constellation)
            .ok_or(Error::UnsupportedConstellation(sv.constellation))?;
        let t = t.to_time_scale(ts);

        let window = if sv.constellation == Constellation::Glonass {
            self.cfg.glonass_window_s
        } else {
            self.cfg.kepler_window_s
        };

        self.ephemerides
            .get(&sv)
            .into_iter()
            .flatten()
            .filter_map(|entry| {
                let dt = (t - entry.ephemeris.toe()).to_seconds().abs();
                if dt > window {
                    return None;
                }
                if self.cfg.enforce_validity && !entry.ephemeris.is_valid(t) {
                    return None;
                }
                Some((dt, entry))
            })
            .min_by(|(dt_a, a), (dt_b, b)| {
                dt_a.partial_cmp(dt_b)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| b.rank.cmp(&a.rank))
            })
            .map(|(_, entry)| &entry.ephemeris)
            .ok_or(Error::NotFound(sv, t))
    }

    /// Returns true if an [Ephemeris] is selected for this [SV] at `t`, and
    /// it is healthy and fit for `t`.
    pub fn is_valid(&self, sv: SV, t: Epoch) -> bool {
        self.select(sv, t)
            .map(|ephemeris| ephemeris.is_valid(t))
            .unwrap_or(false)
    }

    /// Resolves the state of this [SV] at `t`, expressed in any [TimeScale](crate::prelude::TimeScale).
    pub fn xvt(&self, sv: SV, t: Epoch) -> Result<Xvt, Error> {
        let ephemeris = self.select(sv, t)?;
        ephemeris.propagate(t, &self.cfg)
    }

    /// Resolves the state of each [SV] at `t`. One failure does not
    /// prevent the other states from being resolved.
    pub fn xvt_many(&self, t: Epoch, svs: &[SV]) -> Vec<(SV, Result<Xvt, Error>)> {
        svs.iter().map(|sv| (*sv, self.xvt(*sv, t))).collect()
    }

    /// Formats the stored ephemerides as a NAV V3 file. The header is
    /// the first ingested one, with the constellation updated to the content.
    /// Revision 3.05 is used when GLONASS status lines exist, 3.04 otherwise.
    pub fn format<W: Write>(&self, w: &mut W) -> Result<(), Error> {
        let mut header = self.headers.first().cloned().unwrap_or_default();

        let constellations = self
            .ephemerides
            .keys()
            .map(|sv| sv.constellation)
            .collect::<Vec<_>>();
        header.constellation = match constellations.first() {
            Some(first) if constellations.iter().all(|c| c == first) => Some(*first),
            _ => Some(Constellation::Mixed),
        };

        let status_lines = self.ephemerides_iter().any(|eph| eph.has_status_line());
        let version = if status_lines {
            Version::new(3, 5)
        } else {
            Version::new(3, 4)
        };

        header.format(w, version)?;

        let mut frames = self.ephemerides_iter().collect::<Vec<_>>();
        frames.sort_by(|a, b| a.toc().cmp(&b.toc()).then_with(|| a.sv().cmp(&b.sv())));

        for ephemeris in frames {
            let mut rows = ephemeris.to_rows();
            if status_lines && ephemeris.sv().constellation == Constellation::Glonass {
                rows.resize(5, [0.0; 4]);
            }
            write_frame(w, ephemeris.sv(), ephemeris.toc(), &rows)?;
        }
        Ok(())
    }
}
