//! Human-readable waypoint report, split into message-sized chunks.

use crate::models::CalculationResult;

/// Longest chunk the transport accepts, in characters.
pub const DEFAULT_CHUNK_CHARS: usize = 3900;

/// Render the waypoint list as chunks of at most `max_chars` characters.
///
/// Chunks break between waypoints, never inside one. A single waypoint block
/// longer than `max_chars` is sliced by characters.
pub fn format_report(result: &CalculationResult, max_chars: usize) -> Vec<String> {
    chunk_blocks(waypoint_blocks(result), max_chars.max(1))
}

/// One text block per waypoint, with the distance to the next point or a
/// final-point marker.
pub fn waypoint_blocks(result: &CalculationResult) -> Vec<String> {
    result
        .waypoints
        .iter()
        .map(|wp| {
            let header = format!(
                "📍 <b>Point {}</b>: <code>{:.6}, {:.6}</code>\n",
                wp.index, wp.lat, wp.lon
            );
            match result.per_segment_distances_m.get(wp.index) {
                Some(distance_m) => format!(
                    "{header}🛫 {} m | 📏 {:.1} m to next\n\n",
                    wp.altitude_m, distance_m
                ),
                None => format!("{header}🛬 {} m | 🔚 Final point\n\n", wp.altitude_m),
            }
        })
        .collect()
}

/// Closing message with the total and average segment distance.
pub fn format_summary(result: &CalculationResult) -> String {
    format!(
        "✅ <b>Calculation completed!</b>\n\
         📏 Total distance: <code>{:.3} km</code>\n\
         📍 Average segment: <code>{:.1} m</code>\n\
         📂 INAV mission file generated.",
        result.total_distance_km,
        result.avg_segment_km * 1000.0
    )
}

fn chunk_blocks(blocks: Vec<String>, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for block in blocks {
        let block_len = block.chars().count();

        if block_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = block.chars().collect();
            chunks.extend(chars.chunks(max_chars).map(|part| part.iter().collect()));
            continue;
        }

        if current_len + block_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(&block);
        current_len += block_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Waypoint;

    fn result(count: usize) -> CalculationResult {
        let waypoints: Vec<Waypoint> = (0..count)
            .map(|index| Waypoint {
                index,
                lat: 41.311081 + index as f64 * 0.0001,
                lon: 69.240562,
                altitude_m: 100,
            })
            .collect();
        CalculationResult {
            total_distance_km: 3.8416,
            avg_segment_km: 0.76832,
            per_segment_distances_m: vec![11.1; count.saturating_sub(1)],
            waypoints,
        }
    }

    #[test]
    fn lines_show_distance_to_next_and_final_marker() {
        let blocks = waypoint_blocks(&result(2));
        assert_eq!(
            blocks[0],
            "📍 <b>Point 0</b>: <code>41.311081, 69.240562</code>\n🛫 100 m | 📏 11.1 m to next\n\n"
        );
        assert_eq!(
            blocks[1],
            "📍 <b>Point 1</b>: <code>41.311181, 69.240562</code>\n🛬 100 m | 🔚 Final point\n\n"
        );
    }

    #[test]
    fn short_report_is_one_chunk() {
        let chunks = format_report(&result(6), DEFAULT_CHUNK_CHARS);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].matches("📍 <b>Point").count(), 6);
    }

    #[test]
    fn long_report_splits_between_waypoints() {
        let data = result(200);
        let chunks = format_report(&data, DEFAULT_CHUNK_CHARS);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= DEFAULT_CHUNK_CHARS));
        assert!(chunks.iter().all(|c| c.starts_with("📍 <b>Point")));
        assert!(chunks.iter().all(|c| c.ends_with("\n\n")));
        assert_eq!(chunks.concat(), waypoint_blocks(&data).concat());
    }

    #[test]
    fn oversized_block_is_sliced() {
        let data = result(1);
        let block = waypoint_blocks(&data).concat();
        let chunks = format_report(&data, 10);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), block);
    }

    #[test]
    fn summary_reports_km_and_meters() {
        let summary = format_summary(&result(6));
        assert!(summary.contains("<code>3.842 km</code>"));
        assert!(summary.contains("<code>768.3 m</code>"));
    }
}
