//! Canned reply text and placeholder substitution.

pub const GREETING: &[&str] = &[
    "Добро пожаловать! Я ваш персональный AI-помощник. Готов помочь с задачами, календарем и документами.",
    "Здравствуйте! Анализирую ваше расписание и готов предложить оптимизации.",
    "Привет! Вижу у вас {taskCount} активных задач и {eventCount} событий сегодня. Чем помочь?",
];

pub const FALLBACK: &[&str] = &[
    "🤔 Интересный запрос! Позвольте проанализировать и предложить наилучший подход для решения.",
    "💡 Понял вашу задачу. Рекомендую разбить её на этапы для максимальной эффективности.",
    "🎯 Готов помочь! Доступны: управление задачами, планирование встреч, анализ документов и email-помощь.",
];

pub const TASK_CREATED: &str = "✅ Создана задача: \"{title}\"\n\n💡 Рекомендации:\n• Установить дедлайн\n• Выбрать приоритет\n• Добавить детали для лучшего планирования";
pub const TASK_PROMPT: &str = "📝 Готов создать задачу! Назовите, что нужно сделать, и я помогу правильно её структурировать с учетом вашего текущего расписания.";

pub const EVENT_PLANNED: &str = "📅 Планирую событие: \"{title}\"\n\n🎯 Предлагаю время:\n• Завтра 14:00-15:00\n• Послезавтра 10:00-11:00\n\n💡 Учту ваше текущее расписание при выборе оптимального времени.";
pub const EVENT_PROMPT: &str = "📅 Помогу запланировать встречу! Учту ваши существующие события и предложу оптимальное время.";

pub const EMAIL_DRAFT_PROMPT: &str = "📧 Помогу составить письмо!\n\n📝 Выберите стиль:\n• Деловой (формальный)\n• Дружелюбный (неформальный)\n• Краткий (только факты)\n\n💡 Укажите тему и основные пункты, я структурирую текст.";
pub const EMAIL_UNREAD: &str = "📬 У вас {unreadCount} непрочитанных писем.\n\n🔥 Самые важные:\n{highlights}\n\nПомочь с ответами?";
pub const EMAIL_PROMPT: &str = "📧 Готов помочь с электронной почтой: составить письмо, структурировать ответ или проанализировать важные сообщения.";

pub const DOCUMENT_ANALYSIS: &str = "📄 Анализирую документы...\n\n🔍 Найденные паттерны:\n• Ключевые даты и дедлайны\n• Действия к выполнению\n• Важные контакты\n\n💡 Создать задачи на основе содержания?";
pub const DOCUMENT_PROMPT: &str = "📄 Готов проанализировать документы! Загрузите файл, и я:\n\n• Создам краткое резюме\n• Выделю ключевые пункты\n• Предложу действия\n• Найду важные даты";

pub const SCHEDULE_BUSY: &str = "⚠️ Внимание: у вас очень плотный день с {eventCount} событиями. Рекомендую:\n\n• Перенести менее критичные встречи\n• Заблокировать время для важных задач\n• Запланировать перерывы между встречами";
pub const SCHEDULE_OVERLOADED: &str = "📋 У вас {taskCount} активных задач, из них {highPriorityCount} высокоприоритетных.\n\nРекомендую сосредоточиться на: \"{focusTask}\"";
pub const SCHEDULE_BALANCED: &str = "✅ Ваше расписание сбалансировано! {eventCount} событий сегодня, {taskCount} активных задач. Отличная продуктивность!";

pub const PRODUCTIVITY: &str = "📊 Ваша продуктивность:\n\n✅ Выполнено задач: {completedCount}\n⏰ Просрочено: {overdueCount}\n📧 Непрочитанных писем: {unreadCount}\n📄 Документов к обработке: {documentCount}\n\n{verdict}";
pub const PRODUCTIVITY_OVERDUE: &str = "💡 Рекомендую пересмотреть дедлайны просроченных задач.";
pub const PRODUCTIVITY_ON_TRACK: &str = "🎉 Отличная работа! Все в срок!";

pub const DOCUMENT_INSIGHTS: &[&str] = &[
    "📋 Документ \"{docName}\" проанализирован:\n\n🔍 Структура:\n• {sectionCount} основных разделов\n• {keyPointCount} ключевых пунктов\n• {dateCount} важных дат",
    "📊 Анализ \"{docName}\" завершен:\n\n💼 Тип контента: {contentKind}\n📈 Сложность: Средняя\n⚡ Время чтения: {readingMinutes} мин",
    "🎯 Обработка \"{docName}\":\n\n✅ Извлечено ключевых данных\n📅 Найдены временные рамки\n📋 Выделены задачи к выполнению\n🔗 Определены связи с другими проектами",
];
pub const DOCUMENT_RECOMMENDATIONS: &str = "\n\n💡 Рекомендации:\n• Создать задачи на основе содержания\n• Добавить ключевые даты в календарь\n• Сохранить важные контакты\n• Настроить напоминания по дедлайнам";

pub const EMAIL_DRAFT: &str = "📧 Черновик письма ({toneLabel} стиль):\n\n{greeting},\n\n{opening} {topic}.\n\n[Основной текст письма]\n\n{closing},\n[Ваше имя]\n\n💡 Совет: Добавьте конкретные детали и призыв к действию для большей эффективности.";

pub const OPTIMIZATION_HEADER: &str = "🎯 Анализ расписания:\n\n";
pub const OPTIMIZATION_OVERDUE: &str = "⚠️ КРИТИЧНО: {overdueCount} просроченных задач\nПервоочередно: \"{firstOverdue}\"\n\n";
pub const OPTIMIZATION_BUSY: &str = "📅 Плотный день: {eventCount} встреч\nРекомендую 15-минутные перерывы между событиями\n\n";
pub const OPTIMIZATION_PRIORITY: &str = "🔥 Приоритетные задачи ({highPriorityCount}):\n{taskList}\n\n";
pub const OPTIMIZATION_FOOTER: &str = "💡 Рекомендации:\n• Заблокировать 2 часа для глубокой работы\n• Группировать похожие задачи\n• Запланировать время на email и звонки\n• Оставить буферное время для непредвиденных дел";

/// Replace every `{name}` token with its value. Unknown tokens are left as-is.
pub fn fill(template: &str, values: &[(&str, String)]) -> String {
    values.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), value)
    })
}

/// Whether `template` still contains placeholder tokens.
pub fn has_placeholders(template: &str) -> bool {
    template.contains('{') && template.contains('}')
}
