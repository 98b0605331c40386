//! Built-in verse table (KJV, public domain). It is the last step of every
//! fallback chain, so it must never be empty.

use grace_types::api::{ScriptureVerse, VerseSource};
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, Copy)]
pub struct StaticVerse {
    pub text: &'static str,
    pub reference: &'static str,
    pub theme: &'static str,
}

impl StaticVerse {
    pub fn to_verse(self) -> ScriptureVerse {
        ScriptureVerse {
            text: self.text.to_string(),
            reference: self.reference.to_string(),
            theme: Some(self.theme.to_string()),
            source: VerseSource::Static,
        }
    }
}

const fn v(text: &'static str, reference: &'static str, theme: &'static str) -> StaticVerse {
    StaticVerse { text, reference, theme }
}

pub static STATIC_VERSES: &[StaticVerse] = &[
    v("For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.", "John 3:16", "love"),
    v("I can do all things through Christ which strengtheneth me.", "Philippians 4:13", "strength"),
    v("For I know the thoughts that I think toward you, saith the LORD, thoughts of peace, and not of evil, to give you an expected end.", "Jeremiah 29:11", "hope"),
    v("The LORD is my shepherd; I shall not want.", "Psalm 23:1", "comfort"),
    v("Trust in the LORD with all thine heart; and lean not unto thine own understanding.", "Proverbs 3:5", "faith"),
    v("Fear thou not; for I am with thee: be not dismayed; for I am thy God: I will strengthen thee; yea, I will help thee; yea, I will uphold thee with the right hand of my righteousness.", "Isaiah 41:10", "courage"),
    v("And we know that all things work together for good to them that love God, to them who are the called according to his purpose.", "Romans 8:28", "hope"),
    v("Be careful for nothing; but in every thing by prayer and supplication with thanksgiving let your requests be made known unto God.", "Philippians 4:6", "peace"),
    v("And the peace of God, which passeth all understanding, shall keep your hearts and minds through Christ Jesus.", "Philippians 4:7", "peace"),
    v("Come unto me, all ye that labour and are heavy laden, and I will give you rest.", "Matthew 11:28", "comfort"),
    v("Have not I commanded thee? Be strong and of a good courage; be not afraid, neither be thou dismayed: for the LORD thy God is with thee whithersoever thou goest.", "Joshua 1:9", "courage"),
    v("God is our refuge and strength, a very present help in trouble.", "Psalm 46:1", "strength"),
    v("But they that wait upon the LORD shall renew their strength; they shall mount up with wings as eagles; they shall run, and not be weary; and they shall walk, and not faint.", "Isaiah 40:31", "strength"),
    v("We love him, because he first loved us.", "1 John 4:19", "love"),
    v("The LORD is nigh unto them that are of a broken heart; and saveth such as be of a contrite spirit.", "Psalm 34:18", "comfort"),
    v("In every thing give thanks: for this is the will of God in Christ Jesus concerning you.", "1 Thessalonians 5:18", "gratitude"),
    v("O give thanks unto the LORD, for he is good: for his mercy endureth for ever.", "Psalm 107:1", "gratitude"),
    v("If any of you lack wisdom, let him ask of God, that giveth to all men liberally, and upbraideth not; and it shall be given him.", "James 1:5", "wisdom"),
    v("And be ye kind one to another, tenderhearted, forgiving one another, even as God for Christ's sake hath forgiven you.", "Ephesians 4:32", "forgiveness"),
    v("If we confess our sins, he is faithful and just to forgive us our sins, and to cleanse us from all unrighteousness.", "1 John 1:9", "forgiveness"),
    v("Now faith is the substance of things hoped for, the evidence of things not seen.", "Hebrews 11:1", "faith"),
    v("Now the God of hope fill you with all joy and peace in believing, that ye may abound in hope, through the power of the Holy Ghost.", "Romans 15:13", "hope"),
    v("Peace I leave with you, my peace I give unto you: not as the world giveth, give I unto you. Let not your heart be troubled, neither let it be afraid.", "John 14:27", "peace"),
    v("What time I am afraid, I will trust in thee.", "Psalm 56:3", "courage"),
    v("For God hath not given us the spirit of fear; but of power, and of love, and of a sound mind.", "2 Timothy 1:7", "courage"),
    v("It is of the LORD's mercies that we are not consumed, because his compassions fail not. They are new every morning: great is thy faithfulness.", "Lamentations 3:22-23", "hope"),
    v("This is the day which the LORD hath made; we will rejoice and be glad in it.", "Psalm 118:24", "gratitude"),
    v("Commit thy works unto the LORD, and thy thoughts shall be established.", "Proverbs 16:3", "wisdom"),
    v("Rejoicing in hope; patient in tribulation; continuing instant in prayer;", "Romans 12:12", "hope"),
    v("He healeth the broken in heart, and bindeth up their wounds.", "Psalm 147:3", "comfort"),
    v("The LORD thy God in the midst of thee is mighty; he will save, he will rejoice over thee with joy; he will rest in his love, he will joy over thee with singing.", "Zephaniah 3:17", "love"),
    v("Blessed are the peacemakers: for they shall be called the children of God.", "Matthew 5:9", "peace"),
];

/// Entry for a day of the month (1-based); wraps around the table.
pub fn for_day_of_month(day: u32) -> StaticVerse {
    let idx = (day.saturating_sub(1) as usize) % STATIC_VERSES.len();
    STATIC_VERSES[idx]
}

pub fn random() -> StaticVerse {
    *STATIC_VERSES
        .choose(&mut rand::rng())
        .unwrap_or(&STATIC_VERSES[0])
}

/// Random entry of `theme`, or `None` when the table has no such theme.
pub fn random_with_theme(theme: &str) -> Option<StaticVerse> {
    let matching: Vec<&StaticVerse> = STATIC_VERSES.iter().filter(|v| v.theme == theme).collect();
    matching.choose(&mut rand::rng()).map(|v| **v)
}

pub fn has_theme(theme: &str) -> bool {
    STATIC_VERSES.iter().any(|v| v.theme == theme)
}

/// Distinct themes in table order.
pub fn themes() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for verse in STATIC_VERSES {
        if !seen.contains(&verse.theme) {
            seen.push(verse.theme);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_day_of_the_month() {
        assert!(STATIC_VERSES.len() >= 31);
        assert_eq!(for_day_of_month(1).reference, STATIC_VERSES[0].reference);
        assert_eq!(for_day_of_month(31).reference, STATIC_VERSES[30].reference);
        // Out-of-range input still lands on an entry.
        assert_eq!(for_day_of_month(0).reference, STATIC_VERSES[0].reference);
    }

    #[test]
    fn themed_pick_respects_theme() {
        for _ in 0..20 {
            assert_eq!(random_with_theme("courage").unwrap().theme, "courage");
        }
        assert!(random_with_theme("prosperity").is_none());
    }

    #[test]
    fn themes_are_distinct() {
        let themes = themes();
        let mut sorted = themes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), themes.len());
        assert!(themes.contains(&"peace"));
        assert!(has_theme("gratitude"));
    }

    #[test]
    fn static_verse_reports_its_source() {
        let verse = for_day_of_month(4).to_verse();
        assert_eq!(verse.source, VerseSource::Static);
        assert_eq!(verse.theme.as_deref(), Some("comfort"));
    }
}
