//! 빈 라벨 대체 문구.

use rand::seq::IndexedRandom;

/// 재미 모드에서 쓰는 문구
pub const FUNNY_ENTRIES: &[&str] = &[
    "Kaffee ist alle",
    "Mein rechter, rechter Platz ist frei",
    "Bezahlte Werbung",
    "Unterstützt durch Produktplatzierung",
    "Heute ist ein guter Tag für ein Nickerchen.",
    "404: Eintrag nicht gefunden.",
    "Zufallseintrag erstellt",
];

/// 슬롯 라벨이 비었을 때 기록할 문구
///
/// `slot`은 0부터 시작. 일반 모드는 `Button {slot+1}`.
/// 공백만 있는 라벨도 비어 있지 않으면 입력된 그대로 기록한다.
pub fn resolve_label(label: &str, slot: usize, funny_mode: bool) -> String {
    if !label.is_empty() {
        return label.to_string();
    }
    if funny_mode {
        if let Some(entry) = FUNNY_ENTRIES.choose(&mut rand::rng()) {
            return (*entry).to_string();
        }
    }
    format!("Button {}", slot + 1)
}
