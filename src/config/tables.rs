//! Read-only lookup tables consumed by the report pipeline.
//!
//! These are static game data: they are never mutated at runtime. Unit ids
//! without a display name are reported back to the caller instead of being
//! learned here.

/// Leader name for a leader id from match telemetry.
pub fn leader_name(id: i64) -> Option<&'static str> {
    let name = match id {
        1 => "Cutter",
        2 => "Isabel",
        3 => "Anders",
        4 => "Decimus",
        5 => "Atriox",
        6 => "Shipmaster",
        7 => "Forge",
        8 => "Kinsano",
        9 => "Jerome",
        10 => "Arbiter",
        11 => "Johnson",
        12 => "Colony",
        13 => "Serina",
        14 => "YapYap",
        15 => "Pavium",
        16 => "Voridus",
        _ => return None,
    };
    Some(name)
}

/// Display name for a trainable squad id.
pub fn unit_display_name(id: &str) -> Option<&'static str> {
    let name = match id {
        "unsc_veh_warthog_01" => "Warthog",
        "unsc_inf_generic_marine" => "Marine",
        "unsc_veh_forgehog_01" => "Forge",
        "unsc_inf_cyclops_01" => "Cyclop",
        "unsc_veh_foxcannon_01" => "unsc_veh_foxcannon_01",
        "cov_inf_generic_grunt" => "Grunt",
        "cov_inf_lekgologoliath_01" => "Goliath",
        "cov_inf_impervioushunter_01" => "Colony",
        "cov_inf_jackal_01" => "Elite",
        "cov_veh_skitterer_01" => "Skitter",
        "cov_air_banshee_01" => "Banshee",
        "cov_inf_generic_brutejumppack" => "Brute",
        "cov_veh_bruteChopper_01" => "Chopper",
        "unsc_inf_flameMarine_01" => "Flame",
        "unsc_inf_johnson_hero_01" => "Johnson",
        "unsc_inf_sniper_01" => "Sniper",
        "unsc_veh_johnson_mantis_01" => "Mantis",
        "unsc_air_hornet_01" => "Hornet",
        "unsc_air_nightingale_01" => "Nightingale",
        "cov_inf_gruntswarm_01" => "cov_inf_gruntswarm_01",
        "cov_inf_gruntswarm_01_frommine" => "cov_inf_gruntswarm_01_frommine",
        "cov_inf_generic_heavygrunt" => "HeavyGrunt",
        "cov_inf_gruntgoblin01" => "Goblin",
        "cov_inf_hunter_01" => "Hunter",
        "cov_veh_locust_01" => "Locust",
        "cov_inf_mortarwarlord_01" => "Pavium",
        "cov_veh_prowler_01" => "Prowler",
        "cov_veh_gorgon_01" => "Reaver",
        "cov_inf_atrioxchosen_01" => "Atriox",
        "cov_inf_engineer_01" => "Engineer",
        "cov_veh_scarab_01" => "Scarab",
        "unsc_veh_wolverine_01" => "Wolverine",
        "cov_inf_generic_suicideGrunt" => "SuicideGrunt",
        "unsc_inf_spartan_mpjerome_01" => "Jerome",
        "unsc_inf_odst_01" => "ODST",
        "unsc_air_vulture_01" => "Vulture",
        _ => return None,
    };
    Some(name)
}

/// Squad ids excluded from unit production counts (mines, spawned props,
/// ability dummies).
pub fn is_ignored_unit(id: &str) -> bool {
    matches!(
        id,
        "pow_gp_scatterbombDummy_01"
            | "dlc3_pack2_units_covenant_structure_lekgolowall"
            | "unsc_bldg_siegedropTurret_01"
            | "unsc_bldg_johnsonbunker_01_mp"
            | "fx_mine_lotus_01_mp"
            | "fx_mine_ambushmine_01"
            | "fx_mine_ambushmine_02"
            | "cov_bldg_grunt_shadeturret_01"
            | "cov_bldg_grunt_shieldtower_01"
            | "fx_mine_plasma_01_mp"
            | "fx_mine_rcontrolmine_01"
    )
}

/// Rank designation label for a CSR designation id.
pub fn designation_label(id: i64) -> Option<&'static str> {
    let label = match id {
        1 => "Bronze",
        2 => "Silver",
        3 => "Gold",
        4 => "Platinum",
        5 => "Diamond",
        6 => "Onyx",
        7 => "Champ",
        _ => return None,
    };
    Some(label)
}

/// Human label for a match outcome code.
pub fn outcome_label(code: i64) -> Option<&'static str> {
    let label = match code {
        0 => "Unknown",
        1 => "Victory",
        2 => "Defeat",
        3 => "Tie",
        _ => return None,
    };
    Some(label)
}

/// XP required to reach each rank level, ascending.
const XP_LEVELS: [(u32, u64); 99] = [
    (1, 0),
    (2, 1400),
    (3, 3000),
    (4, 5000),
    (5, 7500),
    (6, 10400),
    (7, 13500),
    (8, 16800),
    (9, 20300),
    (10, 24000),
    (11, 27700),
    (12, 31500),
    (13, 35400),
    (14, 39400),
    (15, 43500),
    (16, 47700),
    (17, 52100),
    (18, 56600),
    (19, 61200),
    (20, 66000),
    (21, 71000),
    (22, 76300),
    (23, 81800),
    (24, 87500),
    (25, 93400),
    (26, 99500),
    (27, 105800),
    (28, 112300),
    (29, 119000),
    (30, 126000),
    (31, 133000),
    (32, 140200),
    (33, 147600),
    (34, 155200),
    (35, 163000),
    (36, 171000),
    (37, 179100),
    (38, 187300),
    (39, 195600),
    (40, 204000),
    (41, 212600),
    (42, 221400),
    (43, 230400),
    (44, 239600),
    (45, 249000),
    (46, 258600),
    (47, 268400),
    (48, 278600),
    (49, 289200),
    (50, 320000),
    (51, 331000),
    (52, 342100),
    (53, 353300),
    (54, 364600),
    (55, 376000),
    (56, 387500),
    (57, 399100),
    (58, 410800),
    (59, 422600),
    (60, 434500),
    (61, 446600),
    (62, 458900),
    (63, 471400),
    (64, 484100),
    (65, 497000),
    (66, 510100),
    (67, 523400),
    (68, 536900),
    (69, 550600),
    (70, 564500),
    (71, 578700),
    (72, 593200),
    (73, 608000),
    (74, 623100),
    (75, 638500),
    (76, 654200),
    (77, 670200),
    (78, 686500),
    (79, 703100),
    (80, 720000),
    (81, 737300),
    (82, 755000),
    (83, 773100),
    (84, 791600),
    (85, 810500),
    (86, 829800),
    (87, 849500),
    (88, 869600),
    (89, 890100),
    (90, 911000),
    (91, 932400),
    (92, 954300),
    (93, 976700),
    (94, 999600),
    (95, 1023000),
    (96, 1046900),
    (97, 1071300),
    (98, 1096200),
    (99, 1170000),
];

/// Highest rank level whose XP requirement the given total meets.
pub fn level_for_xp(xp: u64) -> Option<u32> {
    XP_LEVELS
        .iter()
        .take_while(|(_, required)| *required <= xp)
        .map(|(level, _)| *level)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_xp(0), Some(1));
        assert_eq!(level_for_xp(1399), Some(1));
        assert_eq!(level_for_xp(1400), Some(2));
        assert_eq!(level_for_xp(319_999), Some(49));
        assert_eq!(level_for_xp(320_000), Some(50));
        assert_eq!(level_for_xp(5_000_000), Some(99));
    }

    #[test]
    fn leader_and_designation_lookups() {
        assert_eq!(leader_name(5), Some("Atriox"));
        assert_eq!(leader_name(17), None);
        assert_eq!(designation_label(7), Some("Champ"));
        assert_eq!(designation_label(0), None);
    }

    #[test]
    fn ignored_units_are_excluded() {
        assert!(is_ignored_unit("fx_mine_lotus_01_mp"));
        assert!(!is_ignored_unit("unsc_inf_generic_marine"));
    }
}
